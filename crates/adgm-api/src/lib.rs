//! # adgm-api: HTTP Service for the ADGM Corporate Agent
//!
//! ## API Surface
//!
//! | Path                                   | Module                  | Auth |
//! |----------------------------------------|-------------------------|------|
//! | `/`                                    | [`routes::page`]        | no   |
//! | `/health/liveness`, `/health/readiness`| this module             | no   |
//! | `/v1/checklist`                        | [`routes::checklist`]   | yes  |
//! | `/v1/reviews/*`                        | [`routes::reviews`]     | yes  |
//! | `/openapi.json`                        | [`openapi`]             | yes  |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router.
///
/// The upload page and health probes are mounted outside the auth
/// middleware so they remain reachable without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::checklist::router())
        .merge(routes::reviews::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state.clone());

    let public = Router::new()
        .merge(routes::page::router())
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(public).merge(api)
}

/// Liveness probe.
async fn liveness() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Readiness {
    /// A review model is configured.
    pub pipeline: bool,
    /// Reviews are grounded in a knowledge-base index.
    pub index_loaded: bool,
}

/// Readiness probe. 503 until a review model is configured; the body
/// reports whether the knowledge-base index is loaded.
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let body = Readiness {
        pipeline: state.pipeline.is_some(),
        index_loaded: state.index_loaded(),
    };
    let status = if body.pipeline {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

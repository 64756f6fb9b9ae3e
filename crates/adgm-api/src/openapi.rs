//! # OpenAPI Specification
//!
//! Generated with `utoipa` from the route annotations and served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ADGM Corporate Agent API",
        version = "0.1.0",
        description = "Checklist evaluation and red-flag review of ADGM corporate documents.",
    ),
    paths(
        crate::routes::checklist::evaluate_checklist,
        crate::routes::reviews::create_review,
        crate::routes::reviews::get_review,
        crate::routes::reviews::download_report,
        crate::routes::reviews::download_document,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::checklist::ChecklistRequest,
        crate::routes::checklist::ChecklistResponse,
        crate::routes::reviews::ReviewResponse,
        crate::routes::reviews::ReviewedDocumentSummary,
    )),
    tags(
        (name = "checklist", description = "Submission completeness"),
        (name = "reviews", description = "Document review and downloads"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

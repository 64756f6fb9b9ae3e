//! # adgm-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to `PORT` (default 8080).

use std::path::PathBuf;

use adgm_agent::{pipeline_from_config, AgentConfig, ConfigError};
use adgm_api::state::{AppConfig, AppState, DEFAULT_MAX_STORED_REVIEWS};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let auth_token = std::env::var("AUTH_TOKEN").ok().filter(|t| !t.is_empty());
    let max_stored_reviews = std::env::var("MAX_STORED_REVIEWS")
        .ok()
        .and_then(|n| n.parse().ok())
        .unwrap_or(DEFAULT_MAX_STORED_REVIEWS);
    let config = AppConfig {
        port,
        auth_token,
        max_stored_reviews,
    };

    let config_path = std::env::var("ADGM_CONFIG").ok().map(PathBuf::from);
    let agent_config = AgentConfig::load(config_path.as_deref()).map_err(|e| {
        tracing::error!("configuration failed: {e}");
        e
    })?;

    let pipeline = match pipeline_from_config(&agent_config) {
        Ok(pipeline) => {
            tracing::info!(
                model = %agent_config.llm.model,
                index_loaded = pipeline.analyzer().has_index(),
                "review pipeline ready"
            );
            Some(pipeline)
        }
        Err(e @ ConfigError::MissingApiKey(_)) => {
            tracing::warn!("{e}. Review endpoints will return 503.");
            None
        }
        Err(e) => {
            tracing::error!("review pipeline failed to start: {e}");
            return Err(e.into());
        }
    };

    let app = adgm_api::app(AppState::with_config(config, pipeline));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("ADGM corporate agent listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

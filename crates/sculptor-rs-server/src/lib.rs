//! HTTP facade for the Sculptor pipeline.

mod error;
mod extract;
mod handlers;
mod state;
mod types;

pub use error::ApiError;
pub use state::AppState;
pub use types::{GenerateRequest, GenerateResponse, HealthResponse, MemoryInfo, RecordSummary};

use anyhow::Context;
use axum::Router;
use axum::routing::{get, post, put};
use log::info;
use sculptor_rs_config::ServerConfig;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(handlers::generate))
        .route("/history", get(handlers::history))
        .route("/health", get(handlers::health))
        .route("/config", put(handlers::update_config))
        .route("/config/{user_id}", get(handlers::get_config))
        .with_state(state)
}

/// Bind the configured address and serve until the process exits.
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("sculptor server listening (addr={addr})");
    axum::serve(listener, router(state))
        .await
        .context("server terminated")?;
    Ok(())
}

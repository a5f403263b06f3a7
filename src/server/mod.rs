//! HTTP endpoint
//!
//! A thin axum front end over [`TicketPipeline`]: one route that runs a
//! ticket to completion and a health probe.

use crate::config::AppConfig;
use crate::error::Result;
use crate::pipeline::TicketPipeline;
use crate::types::{PipelineResult, TicketRequest};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the application router around a shared pipeline
pub fn build_router(pipeline: Arc<TicketPipeline>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tickets", post(create_ticket))
        .with_state(pipeline)
}

async fn health() -> &'static str {
    "ok"
}

async fn create_ticket(
    State(pipeline): State<Arc<TicketPipeline>>,
    Json(request): Json<TicketRequest>,
) -> (StatusCode, Json<PipelineResult>) {
    info!(source_url = %request.source_url, "received ticket");
    let result = pipeline.process(&request).await;
    let status = if result.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(result))
}

/// Resolve credentials, bind `config.listen_addr` and serve until Ctrl+C
///
/// Fails before binding when no GitHub token is configured.
pub async fn start_server(config: &AppConfig) -> Result<()> {
    let pipeline = Arc::new(TicketPipeline::from_config(config).await?);
    let app = build_router(pipeline);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "ticket2pr listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

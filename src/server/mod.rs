//! HTTP front-end: the HTML form, a JSON API and health probes.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::app::AppContext;
use crate::error::AppError;

pub mod render;
pub mod routes;

/// Build the application router over a shared context.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(routes::index).post(routes::submit))
        .route("/api/v1/forecast", post(routes::forecast_api))
        .route("/health", get(routes::liveness))
        .route("/health/live", get(routes::liveness))
        .route("/health/ready", get(routes::readiness))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn serve(ctx: Arc<AppContext>, host: &str, port: u16) -> Result<(), AppError> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::new(2, format!("Invalid HOST:PORT '{host}:{port}': {e}")))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::new(4, format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("cf v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    axum::serve(listener, router(ctx))
        .await
        .map_err(|e| AppError::new(4, format!("Server error: {e}")))
}

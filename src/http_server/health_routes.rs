//! Diagnostic HTTP Routes
//!
//! Liveness and debug endpoints. None of them touch the item store, so they
//! answer even when persistence is unavailable.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tracing::debug;

/// Body of `GET /debug`
pub const DEBUG_MESSAGE: &str = "🧪 Debug route working";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Create diagnostic routes (mounted at the root)
pub fn health_routes() -> Router {
    Router::new()
        .route("/ping", get(ping_handler))
        .route("/debug", get(debug_handler))
        .route("/health", get(health_handler))
}

async fn ping_handler() -> &'static str {
    debug!("ping route hit");
    "pong"
}

async fn debug_handler() -> &'static str {
    DEBUG_MESSAGE
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

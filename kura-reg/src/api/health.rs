//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// Whether the location catalog has been loaded yet
    pub catalog_loaded: bool,
}

/// GET /health
///
/// Does NOT require authentication, and never triggers a catalog load.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "kura-reg".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_loaded: state.catalog.is_loaded(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

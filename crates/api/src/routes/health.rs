use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` once the backend is ready, `starting` before that.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Backend serving this process.
    pub backend: String,
    /// Whether the backend has finished its setup.
    pub ready: bool,
}

/// GET /health -- returns service and backend readiness.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ready = state.store.is_ready();

    let status = if ready { "ok" } else { "starting" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        backend: state.store.kind().to_string(),
        ready,
    })
}

/// Greeting served at `/`.
pub const GREETING: &str = "Hello, world from the movies API!";

/// GET / -- plain-text greeting.
async fn greeting() -> &'static str {
    GREETING
}

/// Mount the greeting and health check routes at the root level.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(greeting))
        .route("/health", get(health_check))
}

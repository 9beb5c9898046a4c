//! Operational endpoints: health, readiness and liveness.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::time::Instant;

/// Shared state of the operational handlers.
#[derive(Clone)]
pub struct AppState {
    /// `gemini` or `offline`.
    pub collaborator: &'static str,
    pub start_time: Instant,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "adpilot".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        collaborator: state.collaborator.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready. State is in memory, so serving implies ready.
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub collaborator: String,
    pub uptime_secs: u64,
}

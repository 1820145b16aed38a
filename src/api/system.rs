use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthLiveResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthReadyResponse {
    pub ready: bool,
    pub database: bool,
    pub uptime_seconds: u64,
}

/// GET /health
/// Liveness only; touches nothing
pub async fn health() -> Json<HealthLiveResponse> {
    Json(HealthLiveResponse { status: "ok" })
}

/// GET /health/ready
pub async fn ready(State(state): State<Arc<AppState>>) -> Json<HealthReadyResponse> {
    let database = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database readiness check failed");
            false
        }
    };

    Json(HealthReadyResponse {
        ready: database,
        database,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

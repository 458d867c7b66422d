use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::{extract::State, http::StatusCode};
use tokio::time::Sleep;
use tracing::info;

use crate::AppState;
use crate::error::ApiError;

/// 200 while serving, 503 once graceful shutdown has begun.
pub async fn healthcheck(State(state): State<AppState>) -> StatusCode {
    if state.shutting_down.load(Ordering::Relaxed) {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

/// Flip the health check to 503. Requests are still served until the
/// returned sleep completes.
pub fn begin_drain(state: &AppState, delay: Duration) -> Sleep {
    state.shutting_down.store(true, Ordering::Relaxed);
    info!("Draining for {:?} before shutdown", delay);
    tokio::time::sleep(delay)
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

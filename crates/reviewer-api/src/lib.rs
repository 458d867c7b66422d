pub mod error;
pub mod health;
pub mod pull_requests;
pub mod teams;
pub mod users;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use axum::{
    Router,
    routing::{get, post},
};
use reviewer_service::{ReviewError, Service};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub service: Service,
    /// Set once shutdown starts so the health check can report draining.
    pub shutting_down: AtomicBool,
}

impl AppStateInner {
    pub fn new(service: Service) -> Self {
        Self {
            service,
            shutting_down: AtomicBool::new(false),
        }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/team/add", post(teams::add_team))
        .route("/team/get", get(teams::get_team))
        .route("/users/setIsActive", post(users::set_is_active))
        .route("/users/getReview", get(users::get_review))
        .route("/pullRequest/create", post(pull_requests::create))
        .route("/pullRequest/merge", post(pull_requests::merge))
        .route("/pullRequest/reassign", post(pull_requests::reassign))
        // GET routes answer HEAD as well
        .route("/healthcheck", get(health::healthcheck))
        .fallback(health::not_found)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .with_state(state)
}

/// Run a service call on the blocking pool. The store is synchronous, so
/// calls must stay off the async workers.
pub(crate) async fn run_blocking<F, T>(state: &AppState, call: F) -> Result<T, ApiError>
where
    F: FnOnce(&Service) -> Result<T, ReviewError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || call(&state.service))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Join(e)
        })?;
    Ok(result?)
}

use std::any::Any;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reviewer_types::ReviewError;
use reviewer_types::api::{ErrorBody, ErrorCode, ErrorResponse};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error("{0}")]
    BadRequest(String),

    #[error("resource not found")]
    NotFound,

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("handler panicked: {0}")]
    Panicked(String),
}

/// Response for a panic caught by `CatchPanicLayer`: logged, then rendered
/// as a plain internal error.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Panicked(detail).into_response()
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("decode body failed: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(format!("invalid query: {}", rejection.body_text()))
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            ApiError::Review(e) => match e {
                ReviewError::TeamAlreadyExists { .. } => (StatusCode::CONFLICT, ErrorCode::TeamExists),
                ReviewError::TeamNotFound { .. }
                | ReviewError::UserNotFound { .. }
                | ReviewError::PullRequestNotFound { .. } => {
                    (StatusCode::NOT_FOUND, ErrorCode::NotFound)
                }
                ReviewError::TeamNameValidation { .. }
                | ReviewError::UserNameValidation { .. }
                | ReviewError::PullRequestNameValidation { .. } => {
                    (StatusCode::BAD_REQUEST, ErrorCode::BadRequest)
                }
                ReviewError::DuplicateUserIds { .. } => {
                    (StatusCode::BAD_REQUEST, ErrorCode::DuplicateUserId)
                }
                ReviewError::PullRequestAlreadyExists { .. } => {
                    (StatusCode::CONFLICT, ErrorCode::PrExists)
                }
                ReviewError::PullRequestAlreadyMerged { .. } => {
                    (StatusCode::CONFLICT, ErrorCode::PrMerged)
                }
                ReviewError::ReviewerNotAssigned { .. } => {
                    (StatusCode::CONFLICT, ErrorCode::NotAssigned)
                }
                ReviewError::NoReplacementCandidate { .. } => {
                    (StatusCode::CONFLICT, ErrorCode::NoCandidate)
                }
                ReviewError::Conflict { .. } => {
                    (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::Conflict)
                }
                ReviewError::Internal { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError)
                }
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
            ApiError::NotFound => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            ApiError::Join(_) | ApiError::Panicked(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Internal details stay in the log.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            warn!(error = %self, "request rejected");
            self.to_string()
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };
        (status, Json(body)).into_response()
    }
}

//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use concierge_core::envelope::{Envelope, ErrorKind};
use concierge_core::session::SessionError;
use thiserror::Error;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
///
/// Bodies use the envelope shape so clients handle one failure format.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, ErrorKind::Unauthorized, m.clone()),
            AppError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorKind::Unknown,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(Envelope::<()>::fail(kind, message))).into_response()
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::InvalidCredential => AppError::Unauthorized("Invalid API key".into()),
            SessionError::Token(msg) | SessionError::Encryption(msg) => AppError::Internal(msg),
        }
    }
}

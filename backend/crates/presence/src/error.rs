//! Presence Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use kernel::error::kind::ErrorKind;
use thiserror::Error;

pub type PresenceResult<T> = Result<T, PresenceError>;

#[derive(Debug, Error)]
pub enum PresenceError {
    /// Socket opened without `?id=`
    #[error("Missing user id")]
    MissingUserId,

    #[error("Event serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Peer went away mid-send
    #[error("Socket error: {0}")]
    Socket(#[from] axum::Error),
}

impl PresenceError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PresenceError::MissingUserId => ErrorKind::BadRequest,
            PresenceError::Serialize(_) | PresenceError::Socket(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            PresenceError::MissingUserId => AppError::bad_request(self.to_string())
                .with_code("missingUserId")
                .with_field_error("id", "user id required"),
            _ => AppError::internal("Internal server error"),
        }
    }

    pub fn log(&self) {
        match self {
            PresenceError::Serialize(e) => {
                tracing::error!(error = %e, "Presence event serialization failed");
            }
            PresenceError::Socket(e) => {
                tracing::debug!(error = %e, "Presence socket closed while sending");
            }
            PresenceError::MissingUserId => {
                tracing::debug!("Presence socket without user id");
            }
        }
    }
}

impl IntoResponse for PresenceError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PresenceError::MissingUserId.into_response().status(),
            StatusCode::BAD_REQUEST
        );

        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = PresenceError::from(err);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_app_error().message(), "Internal server error");
    }
}

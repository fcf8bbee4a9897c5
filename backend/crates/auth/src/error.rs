//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Every client error carries a stable
//! `code` (`userNotFound`, `incorrectPassword`, ...) the front end switches on.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::{AppError, FieldError};
use kernel::error::kind::ErrorKind;
use platform::jwt::JwtError;
use platform::mailer::MailError;
use platform::storage::StorageError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more request fields failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("A user with this email already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Incorrect password")]
    IncorrectPassword,

    /// No session cookie on a protected route
    #[error("Authentication required")]
    NotAuthenticated,

    /// Session cookie present but unusable (bad signature, wrong token kind, user gone)
    #[error("Session invalid or expired")]
    SessionInvalid,

    #[error("Token invalid")]
    TokenInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("Verification code invalid")]
    CodeInvalid,

    #[error("Token does not carry an email address")]
    EmailNotFound,

    #[error("Nothing to update")]
    NoChanges,

    #[error("A profile image file is required")]
    MissingFile,

    #[error("Unsupported image type: {0}")]
    UnsupportedMediaType(String),

    #[error("OAuth state mismatch")]
    OAuthStateMismatch,

    /// Callback without an authorization code (consent refused or cancelled)
    #[error("Google sign-in was not completed")]
    OAuthDenied,

    #[error("OAuth provider is not configured")]
    OAuthNotConfigured,

    #[error("OAuth provider error: {0}")]
    OAuthProvider(String),

    #[error("Mail delivery failed: {0}")]
    Mail(#[from] MailError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Malformed multipart body, already classified by the kernel
    #[error("{0}")]
    Request(AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Single-field validation failure
    pub fn field(field: &'static str, message: &'static str) -> Self {
        AuthError::Validation(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::CodeInvalid
            | AuthError::EmailNotFound
            | AuthError::NoChanges
            | AuthError::MissingFile
            | AuthError::OAuthStateMismatch
            | AuthError::OAuthDenied => ErrorKind::BadRequest,
            AuthError::UserAlreadyExists => ErrorKind::Conflict,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::IncorrectPassword
            | AuthError::NotAuthenticated
            | AuthError::SessionInvalid
            | AuthError::TokenInvalid
            | AuthError::TokenExpired => ErrorKind::Unauthorized,
            AuthError::UnsupportedMediaType(_) => ErrorKind::UnsupportedMediaType,
            AuthError::OAuthNotConfigured => ErrorKind::ServiceUnavailable,
            AuthError::OAuthProvider(_) | AuthError::Mail(_) => ErrorKind::BadGateway,
            AuthError::Request(e) => e.kind(),
            AuthError::Storage(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> Option<&'static str> {
        let code = match self {
            AuthError::Validation(_) => "validationFailed",
            AuthError::UserAlreadyExists => "userAlreadyExist",
            AuthError::UserNotFound => "userNotFound",
            AuthError::IncorrectPassword => "incorrectPassword",
            AuthError::NotAuthenticated | AuthError::SessionInvalid => "unAuthorized",
            AuthError::TokenInvalid => "tokenInvalid",
            AuthError::TokenExpired => "tokenExpired",
            AuthError::CodeInvalid => "invalid",
            AuthError::EmailNotFound => "emailNotFound",
            AuthError::NoChanges => "noChanges",
            AuthError::MissingFile | AuthError::UnsupportedMediaType(_) => "invalidFile",
            AuthError::OAuthStateMismatch => "oauthStateMismatch",
            AuthError::OAuthDenied => "oauthDenied",
            _ => return None,
        };
        Some(code)
    }

    /// Convert to AppError
    ///
    /// Server-side failures are reported without their details.
    pub fn to_app_error(&self) -> AppError {
        if let AuthError::Request(e) = self {
            return AppError::new(e.kind(), e.message().to_string());
        }

        let message = match self.kind() {
            ErrorKind::InternalServerError => "Internal server error".to_string(),
            _ => self.to_string(),
        };
        let mut err = AppError::new(self.kind(), message);

        if let Some(code) = self.code() {
            err = err.with_code(code);
        }
        if let AuthError::Validation(fields) = self {
            err = err.with_fields(fields.iter().cloned());
        }
        if let AuthError::UnsupportedMediaType(_) = self {
            err = err.with_action("Please upload a JPEG, PNG, WebP, SVG or HEIF image");
        }
        err
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Auth storage error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Mail(e) => {
                tracing::error!(error = %e, "Verification mail could not be sent");
            }
            AuthError::OAuthProvider(msg) => {
                tracing::error!(message = %msg, "Google OAuth request failed");
            }
            AuthError::IncorrectPassword => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::OAuthStateMismatch => {
                tracing::warn!("OAuth callback with mismatching state");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::InternalServerError => AuthError::Internal(err.to_string()),
            _ => AuthError::Request(err),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::TokenExpired,
            JwtError::Invalid(_) => AuthError::TokenInvalid,
            JwtError::Signing(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AuthError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AuthError::Request(AppError::from(err))
    }
}

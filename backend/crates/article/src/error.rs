//! Article Error Types
//!
//! Article-specific variants on top of `kernel::error::AppError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::{AppError, FieldError};
use kernel::error::kind::ErrorKind;
use kernel::id::IdParseError;
use platform::storage::StorageError;
use thiserror::Error;

pub type ArticleResult<T> = Result<T, ArticleError>;

#[derive(Debug, Error)]
pub enum ArticleError {
    /// One or more form fields failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Invalid article id: {0}")]
    InvalidId(#[from] IdParseError),

    #[error("Article not found")]
    ArticleNotFound,

    /// Caller is signed in but does not own the article
    #[error("Only the author can modify this article")]
    NotOwner,

    /// Update: file `index` has no listed section of this article to attach to
    #[error("File {index} has no matching section")]
    FileWithoutSection { index: usize },

    /// Malformed multipart body, already classified by the kernel
    #[error("{0}")]
    Request(AppError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ArticleError {
    pub fn field(field: impl Into<String>, message: &'static str) -> Self {
        let field: String = field.into();
        ArticleError::Validation(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ArticleError::Validation(_)
            | ArticleError::InvalidId(_)
            | ArticleError::FileWithoutSection { .. } => ErrorKind::BadRequest,
            ArticleError::ArticleNotFound => ErrorKind::NotFound,
            ArticleError::NotOwner => ErrorKind::Forbidden,
            ArticleError::Request(e) => e.kind(),
            ArticleError::Storage(_) | ArticleError::Database(_) | ArticleError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> Option<&'static str> {
        let code = match self {
            ArticleError::Validation(_) => "validationFailed",
            ArticleError::InvalidId(_) => "invalidId",
            ArticleError::ArticleNotFound => "articleNotFound",
            ArticleError::NotOwner => "unAuthorized",
            ArticleError::FileWithoutSection { .. } => "fileWithoutSection",
            _ => return None,
        };
        Some(code)
    }

    pub fn to_app_error(&self) -> AppError {
        if let ArticleError::Request(e) = self {
            let mut err = AppError::new(e.kind(), e.message().to_string());
            if let Some(action) = e.action() {
                err = err.with_action(action.to_string());
            }
            return err;
        }

        let message = match self.kind() {
            ErrorKind::InternalServerError => "Internal server error".to_string(),
            _ => self.to_string(),
        };
        let mut err = AppError::new(self.kind(), message);

        if let Some(code) = self.code() {
            err = err.with_code(code);
        }
        match self {
            ArticleError::Validation(fields) => {
                err = err.with_fields(fields.iter().cloned());
            }
            ArticleError::InvalidId(_) => {
                err = err.with_field_error("id", "invalid id");
            }
            ArticleError::FileWithoutSection { .. } => {
                err = err.with_action("List one section id per uploaded file, in the same order");
            }
            _ => {}
        }
        err
    }

    fn log(&self) {
        match self {
            ArticleError::Database(e) => {
                tracing::error!(error = %e, "Article database error");
            }
            ArticleError::Storage(e) => {
                tracing::error!(error = %e, "Article storage error");
            }
            ArticleError::Internal(msg) => {
                tracing::error!(message = %msg, "Article internal error");
            }
            ArticleError::NotOwner => {
                tracing::warn!("Article modification attempted by non-owner");
            }
            _ => {
                tracing::debug!(error = %self, "Article error");
            }
        }
    }
}

impl IntoResponse for ArticleError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for ArticleError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::InternalServerError => ArticleError::Internal(err.to_string()),
            _ => ArticleError::Request(err),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ArticleError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ArticleError::from(AppError::from(err))
    }
}

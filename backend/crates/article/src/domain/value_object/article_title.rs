//! Article Title Value Object
//!
//! ## Invariants
//! - Surrounding whitespace trimmed
//! - At least 3 characters

use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

pub const ARTICLE_TITLE_MIN_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleTitle(String);

impl ArticleTitle {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = raw.as_ref().trim();

        if trimmed.is_empty() {
            return Err(invalid("title required"));
        }
        if trimmed.chars().count() < ARTICLE_TITLE_MIN_LENGTH {
            return Err(invalid("invalid title"));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid(message: &'static str) -> AppError {
    AppError::bad_request("Invalid title").with_field_error("title", message)
}

impl fmt::Display for ArticleTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

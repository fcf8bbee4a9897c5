//! Section Content Value Object
//!
//! Body text of one section. Checked per section, at least 6 characters
//! once trimmed.

use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;

pub const SECTION_CONTENT_MIN_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionContent(String);

impl SectionContent {
    /// `field` names the form field in the error, e.g. `sections[2].content`
    pub fn new(raw: impl AsRef<str>, field: impl Into<String>) -> AppResult<Self> {
        let trimmed = raw.as_ref().trim();

        let message = if trimmed.is_empty() {
            "content required"
        } else if trimmed.chars().count() < SECTION_CONTENT_MIN_LENGTH {
            "invalid content"
        } else {
            return Ok(Self(trimmed.to_string()));
        };

        let field: String = field.into();
        Err(AppError::bad_request("Invalid content").with_field_error(field, message))
    }

    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_length() {
        assert!(SectionContent::new("Bonjour", "content").is_ok());

        let err = SectionContent::new("  court ", "sections[1].content").unwrap_err();
        assert_eq!(err.fields()[0].field, "sections[1].content");
        assert_eq!(err.fields()[0].message, "invalid content");

        let err = SectionContent::new("", "content").unwrap_err();
        assert_eq!(err.fields()[0].message, "content required");
    }
}

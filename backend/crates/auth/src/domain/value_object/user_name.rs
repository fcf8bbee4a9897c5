//! User Name Value Object
//!
//! The display name shown on articles and profiles ("Jeanne Dupont",
//! "Association Les Petits Pas"). It is not unique and not used to log in;
//! the email address is.
//!
//! ## Invariants
//! - NFKC normalized, surrounding whitespace trimmed
//! - Inner whitespace runs collapsed to a single space
//! - Length: 3 to 60 characters (after normalization)
//! - No control characters

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let collapsed = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

        if collapsed.is_empty() {
            return Err(invalid("name required"));
        }

        if collapsed.chars().any(char::is_control) {
            return Err(invalid("invalid name"));
        }

        let len = collapsed.chars().count();
        if !(USER_NAME_MIN_LENGTH..=USER_NAME_MAX_LENGTH).contains(&len) {
            return Err(invalid("invalid name"));
        }

        Ok(Self(collapsed))
    }

    /// Names coming from an OAuth profile may be shorter than the local
    /// policy allows; they are stored as given (trimmed) and fixed by the user.
    pub fn from_provider(raw: impl AsRef<str>) -> Self {
        Self::new(raw.as_ref()).unwrap_or_else(|_| Self(raw.as_ref().trim().to_string()))
    }

    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid(message: &'static str) -> AppError {
    AppError::bad_request("Invalid name").with_field_error("name", message)
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert_eq!(UserName::new("Zoé").unwrap().as_str(), "Zoé");
        assert_eq!(
            UserName::new("  Jeanne   Dupont ").unwrap().as_str(),
            "Jeanne Dupont"
        );
    }

    #[test]
    fn test_length_bounds() {
        assert!(UserName::new("ab").is_err());
        assert!(UserName::new("abc").is_ok());
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_blank_is_required_error() {
        let err = UserName::new("   ").unwrap_err();
        assert_eq!(err.fields()[0].field, "name");
        assert_eq!(err.fields()[0].message, "name required");
    }

    #[test]
    fn test_nfkc() {
        // Full-width letters collapse to ASCII
        assert_eq!(UserName::new("ＡＢＣ").unwrap().as_str(), "ABC");
    }

    #[test]
    fn test_control_characters_rejected() {
        assert!(UserName::new("abc\u{0000}def").is_err());
    }

    #[test]
    fn test_from_provider_keeps_short_names() {
        assert_eq!(UserName::from_provider(" Al ").as_str(), "Al");
        assert_eq!(UserName::from_provider("Ada Lovelace").as_str(), "Ada Lovelace");
    }
}

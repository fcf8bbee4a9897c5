use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

const SECTOR_MIN_LENGTH: usize = 2;
const SECTOR_MAX_LENGTH: usize = 100;

/// Field of activity of an organization ("Éducation", "Santé"...)
///
/// Only organizations carry one; the wire name is `secteur`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector(String);

impl Sector {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = raw.as_ref().trim();

        if trimmed.is_empty() {
            return Err(invalid("secteur required for organization"));
        }

        let len = trimmed.chars().count();
        if !(SECTOR_MIN_LENGTH..=SECTOR_MAX_LENGTH).contains(&len) {
            return Err(invalid("invalid secteur"));
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
    AppError::bad_request("Invalid secteur").with_field_error("secteur", message)
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Kind of account: an individual or an organization (association, school...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum UserType {
    #[default]
    #[display("person")]
    Person = 0,
    #[display("organization")]
    Organization = 1,
}

impl UserType {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserType::Person => "person",
            UserType::Organization => "organization",
        }
    }

    #[inline]
    pub const fn is_organization(&self) -> bool {
        matches!(self, UserType::Organization)
    }

    /// Unknown ids fall back to `Person` with an error log
    #[inline]
    pub fn from_id(id: i16) -> Self {
        match id {
            0 => UserType::Person,
            1 => UserType::Organization,
            _ => {
                tracing::error!(user_type = id, "Invalid UserType id");
                UserType::Person
            }
        }
    }

    pub fn from_code(code: &str) -> AppResult<Self> {
        match code.trim() {
            "person" => Ok(UserType::Person),
            "organization" => Ok(UserType::Organization),
            "" => Err(AppError::bad_request("Invalid type").with_field_error("type", "type required")),
            _ => Err(AppError::bad_request("Invalid type").with_field_error("type", "invalid type")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for user_type in [UserType::Person, UserType::Organization] {
            assert_eq!(UserType::from_code(user_type.code()).unwrap(), user_type);
            assert_eq!(UserType::from_id(user_type.id()), user_type);
            assert_eq!(user_type.to_string(), user_type.code());
        }
    }

    #[test]
    fn test_invalid_code() {
        let err = UserType::from_code("recruiter").unwrap_err();
        assert_eq!(err.fields()[0].field, "type");
        assert_eq!(err.fields()[0].message, "invalid type");
    }

    #[test]
    fn test_unknown_id_defaults_to_person() {
        assert_eq!(UserType::from_id(42), UserType::Person);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserType::Organization).unwrap(),
            "\"organization\""
        );
    }
}

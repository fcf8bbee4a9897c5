//! Field error collection
//!
//! Value objects fail one at a time; forms report every invalid field at
//! once.

use kernel::error::app_error::{AppResult, FieldError};

use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the value, or record the failure and return `None`
    pub fn check<T>(&mut self, result: AppResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                if err.fields().is_empty() {
                    self.0.push(FieldError {
                        field: "body".into(),
                        message: err.message().to_string().into(),
                    });
                } else {
                    self.0.extend(err.fields().iter().cloned());
                }
                None
            }
        }
    }

    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Err(AuthError::Validation)` when anything was recorded
    pub fn finish(self) -> AuthResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AuthError::Validation(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::error::app_error::AppError;

    #[test]
    fn test_collects_all_failures() {
        let mut errors = FieldErrors::new();
        let a: Option<i32> =
            errors.check(Err(AppError::bad_request("x").with_field_error("name", "invalid name")));
        let b = errors.check(Ok(5));
        errors.push("secteur", "secteur required for organization");

        assert!(a.is_none());
        assert_eq!(b, Some(5));
        match errors.finish() {
            Err(AuthError::Validation(fields)) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].field, "name");
                assert_eq!(fields[1].field, "secteur");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_is_ok() {
        assert!(FieldErrors::new().finish().is_ok());
    }
}

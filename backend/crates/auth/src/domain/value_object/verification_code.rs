//! Verification Code Value Object
//!
//! Six-digit code mailed to the user after registration (and after a login
//! on an unverified account). Tokens carry a keyed digest of it, see
//! [`VerificationCode::digest`]: without the server key the 900 000
//! possible codes cannot be tried offline.

use kernel::error::app_error::{AppError, AppResult};
use platform::crypto;

use crate::domain::value_object::UserId;
use std::fmt;

const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct VerificationCode(u32);

impl VerificationCode {
    pub fn generate() -> Self {
        Self(crypto::random_in(CODE_MIN..CODE_MAX + 1))
    }

    /// Parse the value the client sent: a JSON integer or a numeric string
    pub fn from_json(value: &serde_json::Value) -> AppResult<Self> {
        let parsed = match value {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) if s.trim().is_empty() => {
                return Err(invalid("code required"));
            }
            serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
            serde_json::Value::Null => return Err(invalid("code required")),
            _ => None,
        };

        parsed
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| (CODE_MIN..=CODE_MAX).contains(n))
            .map(Self)
            .ok_or_else(|| invalid("invalid code"))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Base64url HMAC-SHA256 of `user_id:code` under `key`
    pub fn digest(&self, key: &[u8], user_id: &UserId) -> String {
        let message = format!("{}:{:06}", user_id, self.0);
        crypto::to_base64url(&crypto::hmac_sha256(key, message.as_bytes()))
    }

    /// Constant-time comparison against a digest taken from a token
    pub fn matches_digest(&self, key: &[u8], user_id: &UserId, digest: &str) -> bool {
        crypto::constant_time_eq(self.digest(key, user_id).as_bytes(), digest.as_bytes())
    }
}

fn invalid(message: &'static str) -> AppError {
    AppError::bad_request("Invalid code").with_field_error("code", message)
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VerificationCode").field(&"******").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_is_six_digits() {
        for _ in 0..100 {
            let code = VerificationCode::generate();
            assert_eq!(code.to_string().len(), 6);
            assert!((CODE_MIN..=CODE_MAX).contains(&code.value()));
        }
    }

    #[test]
    fn test_from_json_accepts_number_and_string() {
        assert_eq!(
            VerificationCode::from_json(&json!(123456)).unwrap().value(),
            123456
        );
        assert_eq!(
            VerificationCode::from_json(&json!(" 654321 ")).unwrap().value(),
            654321
        );
    }

    #[test]
    fn test_from_json_rejects() {
        for bad in [json!(12345), json!(1234567), json!("abc"), json!(-1), json!(1.5), json!([1])] {
            let err = VerificationCode::from_json(&bad).unwrap_err();
            assert_eq!(err.fields()[0].message, "invalid code", "{bad}");
        }
        let err = VerificationCode::from_json(&json!(null)).unwrap_err();
        assert_eq!(err.fields()[0].message, "code required");
    }

    const KEY: &[u8] = b"server-secret";

    #[test]
    fn test_digest_matching() {
        let user_id = UserId::new();
        let code = VerificationCode::from_json(&json!(424242)).unwrap();
        let digest = code.digest(KEY, &user_id);
        assert!(code.matches_digest(KEY, &user_id, &digest));

        let other = VerificationCode::from_json(&json!(424243)).unwrap();
        assert!(!other.matches_digest(KEY, &user_id, &digest));
        assert!(!code.matches_digest(KEY, &UserId::new(), &digest));
        assert!(!code.matches_digest(b"other-secret", &user_id, &digest));
        assert!(!digest.contains("424242"));
    }

    #[test]
    fn test_digest_is_not_a_plain_hash() {
        let user_id = UserId::new();
        let code = VerificationCode::from_json(&json!(424242)).unwrap();
        let digest = code.digest(KEY, &user_id);

        let unkeyed = [
            "424242".to_string(),
            format!("{}:424242", user_id),
        ];
        for message in unkeyed {
            assert_ne!(digest, crypto::to_base64url(&crypto::sha256(message.as_bytes())));
        }
    }

    #[test]
    fn test_debug_hides_code() {
        let code = VerificationCode::from_json(&json!(424242)).unwrap();
        assert!(!format!("{:?}", code).contains("424242"));
    }
}

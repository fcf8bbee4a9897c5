//! JWT Signing and Verification
//!
//! HS256 tokens whose payload is nested under an `infos` claim:
//!
//! ```json
//! { "infos": { "id": "…", "authToken": true }, "iat": 1700000000, "exp": 1731536000 }
//! ```
//!
//! The same codec signs session cookies, e-mail verification tokens and
//! OAuth sign-up tokens; the payload type decides which is which.

use std::fmt;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Clock skew tolerated when checking `exp`
const DEFAULT_LEEWAY_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token expired")]
    Expired,

    #[error("Token invalid: {0}")]
    Invalid(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    infos: T,
    iat: u64,
    exp: u64,
}

/// Decoded token: the payload plus its registered timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified<T> {
    pub infos: T,
    pub issued_at: u64,
    pub expires_at: u64,
}

/// HMAC-SHA256 JWT codec
#[derive(Clone)]
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = DEFAULT_LEEWAY_SECS;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.validation.leeway = leeway_secs;
        self
    }

    /// Sign `payload` so that it expires `ttl` from now
    pub fn sign<T: Serialize>(&self, payload: &T, ttl: Duration) -> Result<String, JwtError> {
        let iat = jsonwebtoken::get_current_timestamp();
        self.encode_envelope(payload, iat, iat.saturating_add(ttl.as_secs()))
    }

    fn encode_envelope<T: Serialize>(
        &self,
        payload: &T,
        iat: u64,
        exp: u64,
    ) -> Result<String, JwtError> {
        let claims = Envelope {
            infos: payload,
            iat,
            exp,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, then decode the `infos` payload
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<Verified<T>, JwtError> {
        let data = decode::<Envelope<T>>(token, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                JwtErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            },
        )?;

        Ok(Verified {
            infos: data.claims.infos,
            issued_at: data.claims.iat,
            expires_at: data.claims.exp,
        })
    }
}

impl fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtCodec")
            .field("algorithm", &"HS256")
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct SessionInfos {
        id: String,
        auth_token: bool,
    }

    #[derive(Debug, Deserialize)]
    struct OtherInfos {
        #[allow(dead_code)]
        email: String,
    }

    fn infos() -> SessionInfos {
        SessionInfos {
            id: "4f1b".to_string(),
            auth_token: true,
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let codec = JwtCodec::new(b"test-secret");
        let token = codec.sign(&infos(), Duration::from_secs(3600)).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let verified = codec.verify::<SessionInfos>(&token).unwrap();
        assert_eq!(verified.infos, infos());
        assert_eq!(verified.expires_at - verified.issued_at, 3600);
    }

    #[test]
    fn test_payload_is_nested_under_infos() {
        let codec = JwtCodec::new(b"test-secret");
        let token = codec.sign(&infos(), Duration::from_secs(60)).unwrap();

        let body = token.split('.').nth(1).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&crate::crypto::from_base64url(body).unwrap()).unwrap();
        assert_eq!(json["infos"]["authToken"], true);
        assert!(json["exp"].is_u64());
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = JwtCodec::new(b"secret-a")
            .sign(&infos(), Duration::from_secs(60))
            .unwrap();
        let err = JwtCodec::new(b"secret-b")
            .verify::<SessionInfos>(&token)
            .unwrap_err();
        assert!(matches!(err, JwtError::Invalid(_)));
    }

    #[test]
    fn test_expired_token() {
        let codec = JwtCodec::new(b"test-secret").with_leeway(0);
        let now = jsonwebtoken::get_current_timestamp();
        let token = codec.encode_envelope(&infos(), now - 100, now - 50).unwrap();

        let err = codec.verify::<SessionInfos>(&token).unwrap_err();
        assert!(matches!(err, JwtError::Expired));
    }

    #[test]
    fn test_payload_shape_mismatch_is_invalid() {
        let codec = JwtCodec::new(b"test-secret");
        let token = codec.sign(&infos(), Duration::from_secs(60)).unwrap();
        assert!(matches!(
            codec.verify::<OtherInfos>(&token),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let codec = JwtCodec::new(b"test-secret");
        assert!(matches!(
            codec.verify::<SessionInfos>("not.a.jwt"),
            Err(JwtError::Invalid(_))
        ));
    }
}

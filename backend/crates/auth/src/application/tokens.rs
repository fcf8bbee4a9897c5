//! Token Service
//!
//! Three kinds of JWT share one signing secret. They are told apart by the
//! shape of their `infos` payload:
//!
//! | kind         | infos                                         |
//! |--------------|-----------------------------------------------|
//! | session      | `{ id, authToken: true }`                     |
//! | verification | `{ id, codeHash }`                            |
//! | oauth signup | `{ email, name, profile, userNotFound: true }` |

use std::sync::Arc;
use std::time::Duration;

use platform::jwt::JwtCodec;
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::value_object::{UserId, verification_code::VerificationCode};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub id: UserId,
    pub auth_token: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationClaims {
    pub id: UserId,
    pub code_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthSignupClaims {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: String,
    /// Provider picture URL
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub user_not_found: bool,
}

#[derive(Debug, Clone)]
pub struct TokenService {
    codec: JwtCodec,
    config: Arc<AuthConfig>,
}

impl TokenService {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            codec: config.jwt_codec(),
            config,
        }
    }

    fn sign<T: Serialize>(&self, infos: &T, ttl: Duration) -> AuthResult<String> {
        Ok(self.codec.sign(infos, ttl)?)
    }

    pub fn issue_session(&self, user_id: UserId) -> AuthResult<String> {
        let claims = SessionClaims {
            id: user_id,
            auth_token: true,
        };
        self.sign(&claims, self.config.token_max_age)
    }

    pub fn issue_verification(&self, user_id: UserId, code: &VerificationCode) -> AuthResult<String> {
        let claims = VerificationClaims {
            id: user_id,
            code_hash: code.digest(&self.config.jwt_secret, &user_id),
        };
        self.sign(&claims, self.config.token_max_age)
    }

    pub fn issue_oauth_signup(
        &self,
        email: &str,
        name: &str,
        profile: Option<&str>,
    ) -> AuthResult<String> {
        let claims = OAuthSignupClaims {
            email: Some(email.to_string()),
            name: name.to_string(),
            profile: profile.map(str::to_string),
            user_not_found: true,
        };
        self.sign(&claims, self.config.oauth_signup_ttl)
    }

    /// User id of a valid session token
    pub fn verify_session(&self, token: &str) -> AuthResult<UserId> {
        let claims = self
            .codec
            .verify::<SessionClaims>(token)
            .map_err(|_| AuthError::SessionInvalid)?
            .infos;

        if !claims.auth_token {
            return Err(AuthError::SessionInvalid);
        }
        Ok(claims.id)
    }

    pub fn verify_verification(&self, token: &str) -> AuthResult<VerificationClaims> {
        Ok(self.codec.verify::<VerificationClaims>(token)?.infos)
    }

    /// Whether `code` is the one the verification token was issued for
    pub fn code_matches(&self, claims: &VerificationClaims, code: &VerificationCode) -> bool {
        code.matches_digest(&self.config.jwt_secret, &claims.id, &claims.code_hash)
    }

    pub fn verify_oauth_signup(&self, token: &str) -> AuthResult<OAuthSignupClaims> {
        Ok(self.codec.verify::<OAuthSignupClaims>(token)?.infos)
    }

    /// Signature and expiry only, whatever the payload
    pub fn verify_any(&self, token: &str) -> AuthResult<()> {
        self.codec.verify::<serde_json::Value>(token)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(Arc::new(AuthConfig::development()))
    }

    #[test]
    fn test_session_roundtrip() {
        let tokens = service();
        let user_id = UserId::new();
        let token = tokens.issue_session(user_id).unwrap();
        assert_eq!(tokens.verify_session(&token).unwrap(), user_id);
    }

    #[test]
    fn test_verification_token_is_not_a_session() {
        let tokens = service();
        let token = tokens
            .issue_verification(UserId::new(), &VerificationCode::generate())
            .unwrap();

        assert!(matches!(
            tokens.verify_session(&token),
            Err(AuthError::SessionInvalid)
        ));
        assert!(tokens.verify_verification(&token).is_ok());
        assert!(tokens.verify_any(&token).is_ok());
    }

    #[test]
    fn test_oauth_token_is_not_a_session() {
        let tokens = service();
        let token = tokens
            .issue_oauth_signup("zoe@example.com", "Zoé", Some("https://pic"))
            .unwrap();

        assert!(tokens.verify_session(&token).is_err());
        let claims = tokens.verify_oauth_signup(&token).unwrap();
        assert_eq!(claims.email.as_deref(), Some("zoe@example.com"));
        assert!(claims.user_not_found);
    }

    #[test]
    fn test_other_secret_is_invalid() {
        let token = service().issue_session(UserId::new()).unwrap();
        assert!(matches!(
            service().verify_any(&token),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_verification_token_hides_code() {
        let tokens = service();
        let code = VerificationCode::generate();
        let token = tokens.issue_verification(UserId::new(), &code).unwrap();
        let claims = tokens.verify_verification(&token).unwrap();
        assert!(tokens.code_matches(&claims, &code));
        assert!(!token.contains(&code.to_string()));
    }

    /// Reading the payload and trying every code must not reveal it
    #[test]
    fn test_code_not_recoverable_from_payload() {
        use platform::crypto;

        let tokens = service();
        let user_id = UserId::new();
        let code = VerificationCode::from_json(&serde_json::json!(444837)).unwrap();
        let token = tokens.issue_verification(user_id, &code).unwrap();

        let payload = token.split('.').nth(1).unwrap();
        let payload: serde_json::Value =
            serde_json::from_slice(&crypto::from_base64url(payload).unwrap()).unwrap();
        let code_hash = payload["infos"]["codeHash"].as_str().unwrap().to_string();

        let recovered = (100_000u32..=999_999).find(|candidate| {
            let plain = crypto::to_base64url(&crypto::sha256(candidate.to_string().as_bytes()));
            let keyless = crypto::to_base64url(&crypto::hmac_sha256(
                b"",
                format!("{}:{:06}", user_id, candidate).as_bytes(),
            ));
            plain == code_hash || keyless == code_hash
        });
        assert_eq!(recovered, None);

        let claims = tokens.verify_verification(&token).unwrap();
        assert!(tokens.code_matches(&claims, &code));
    }
}

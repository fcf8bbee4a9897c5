//! Verify Code Use Case
//!
//! Checks the mailed code against the digest carried by the verification
//! token, marks the account verified and opens a session.

use std::sync::Arc;

use crate::application::tokens::TokenService;
use crate::application::validation::FieldErrors;
use crate::domain::repository::UserInfosRepository;
use crate::domain::value_object::{UserId, verification_code::VerificationCode};
use crate::error::{AuthError, AuthResult};

pub struct VerifyCodeOutput {
    pub user_id: UserId,
    pub session_token: String,
}

pub struct VerifyCodeUseCase<R>
where
    R: UserInfosRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> VerifyCodeUseCase<R>
where
    R: UserInfosRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    pub async fn execute(
        &self,
        token: &str,
        code: &serde_json::Value,
    ) -> AuthResult<VerifyCodeOutput> {
        let mut errors = FieldErrors::new();
        let code = errors.check(VerificationCode::from_json(code));
        errors.finish()?;
        let Some(code) = code else {
            return Err(AuthError::Internal("validation state out of sync".to_string()));
        };

        let claims = self.tokens.verify_verification(token)?;

        if !self.tokens.code_matches(&claims, &code) {
            tracing::debug!(user_id = %claims.id, "Verification code mismatch");
            return Err(AuthError::CodeInvalid);
        }

        if !self.repo.mark_verified(&claims.id).await? {
            return Err(AuthError::UserNotFound);
        }

        let session_token = self.tokens.issue_session(claims.id)?;
        tracing::info!(user_id = %claims.id, "Email verified");

        Ok(VerifyCodeOutput {
            user_id: claims.id,
            session_token,
        })
    }
}

//! Login Use Case
//!
//! Email + password. A verified account gets a session; an unverified one
//! gets a fresh verification code instead.

use std::sync::Arc;

use platform::mailer::Mailer;

use crate::application::config::AuthConfig;
use crate::application::mail::verification_mail;
use crate::application::tokens::TokenService;
use crate::application::validation::FieldErrors;
use crate::domain::repository::{UserInfosRepository, UserRepository};
use crate::domain::value_object::{
    UserId, email::Email, user_password::RawPassword, verification_code::VerificationCode,
};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub email: String,
    pub password: String,
    /// Persistent cookie instead of a browser-session one
    pub remember: bool,
}

#[derive(Debug)]
pub enum LoginOutput {
    /// Session token, to be set as cookie
    SignedIn {
        user_id: UserId,
        session_token: String,
        remember: bool,
    },
    /// Account not verified yet: a new code was mailed
    VerificationRequired { token: String },
}

pub struct LoginUseCase<R, M>
where
    R: UserRepository + UserInfosRepository,
    M: Mailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R, M> LoginUseCase<R, M>
where
    R: UserRepository + UserInfosRepository,
    M: Mailer,
{
    pub fn new(
        repo: Arc<R>,
        mailer: Arc<M>,
        tokens: Arc<TokenService>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            repo,
            mailer,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let mut errors = FieldErrors::new();
        let email = errors.check(Email::new(&input.email));
        if input.password.is_empty() {
            errors.push("password", "password required");
        } else if input.password.chars().count() < platform::password::MIN_PASSWORD_LENGTH {
            errors.push("password", "invalid password");
        }
        errors.finish()?;
        let Some(email) = email else {
            return Err(AuthError::Internal("validation state out of sync".to_string()));
        };

        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // a value the policy refuses was never hashed at sign-up
        let password_ok = RawPassword::new(input.password)
            .map(|raw| user.password.verify(&raw, self.config.pepper()))
            .unwrap_or(false);
        if !password_ok {
            tracing::warn!(user_id = %user.user_id, "Incorrect password");
            return Err(AuthError::IncorrectPassword);
        }

        let verified = self
            .repo
            .find_infos(&user.user_id)
            .await?
            .is_some_and(|infos| infos.is_verified);

        if !verified {
            let code = VerificationCode::generate();
            self.mailer
                .send(verification_mail(&user.email, &user.name, &code))
                .await?;
            let token = self.tokens.issue_verification(user.user_id, &code)?;

            tracing::info!(user_id = %user.user_id, "Login on unverified account, code re-sent");
            return Ok(LoginOutput::VerificationRequired { token });
        }

        let session_token = self.tokens.issue_session(user.user_id)?;
        tracing::info!(user_id = %user.user_id, remember = input.remember, "User logged in");

        Ok(LoginOutput::SignedIn {
            user_id: user.user_id,
            session_token,
            remember: input.remember,
        })
    }
}

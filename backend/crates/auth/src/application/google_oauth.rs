//! Google OAuth Use Case
//!
//! Authorization-code flow:
//! 1. `start` picks a random `state` and builds the consent URL
//! 2. Google redirects back with `code` + `state`
//! 3. `callback` checks the state, exchanges the code and looks the email up
//!
//! Known users get a session; unknown ones get a sign-up token and finish
//! on the front end with [`OAuthRegisterUseCase`](super::oauth_register::OAuthRegisterUseCase).

use std::sync::Arc;

use platform::crypto;

use crate::application::tokens::TokenService;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{UserId, email::Email};
use crate::error::{AuthError, AuthResult};

/// Identity returned by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProfile {
    pub email: Option<String>,
    pub name: String,
    pub picture: Option<String>,
}

#[trait_variant::make(OAuthProvider: Send)]
pub trait LocalOAuthProvider {
    /// Consent screen URL for the given anti-CSRF `state`
    fn authorize_url(&self, state: &str) -> AuthResult<String>;

    /// Exchange the authorization code and fetch the user's profile
    async fn fetch_profile(&self, code: &str) -> AuthResult<OAuthProfile>;
}

pub struct OAuthStart {
    pub redirect_url: String,
    pub state: String,
}

#[derive(Debug)]
pub enum OAuthOutcome {
    SignedIn {
        user_id: UserId,
        session_token: String,
    },
    /// No account yet for this email
    SignUpRequired { signup_token: String },
}

pub struct GoogleOAuthUseCase<R, P>
where
    R: UserRepository,
    P: OAuthProvider,
{
    repo: Arc<R>,
    provider: Arc<P>,
    tokens: Arc<TokenService>,
}

impl<R, P> GoogleOAuthUseCase<R, P>
where
    R: UserRepository,
    P: OAuthProvider,
{
    pub fn new(repo: Arc<R>, provider: Arc<P>, tokens: Arc<TokenService>) -> Self {
        Self {
            repo,
            provider,
            tokens,
        }
    }

    pub fn start(&self) -> AuthResult<OAuthStart> {
        let state = crypto::random_token(24);
        let redirect_url = self.provider.authorize_url(&state)?;
        Ok(OAuthStart {
            redirect_url,
            state,
        })
    }

    pub async fn callback(
        &self,
        code: &str,
        state: &str,
        expected_state: Option<&str>,
    ) -> AuthResult<OAuthOutcome> {
        let state_ok = expected_state
            .is_some_and(|expected| crypto::constant_time_eq(expected.as_bytes(), state.as_bytes()));
        if !state_ok {
            return Err(AuthError::OAuthStateMismatch);
        }

        let code = code.trim();
        if code.is_empty() {
            return Err(AuthError::OAuthDenied);
        }

        let profile = self.provider.fetch_profile(code).await?;

        let email = profile
            .email
            .as_deref()
            .and_then(|email| Email::new(email).ok())
            .ok_or(AuthError::EmailNotFound)?;

        match self.repo.find_by_email(&email).await? {
            Some(user) => {
                let session_token = self.tokens.issue_session(user.user_id)?;
                tracing::info!(user_id = %user.user_id, "User logged in via Google");
                Ok(OAuthOutcome::SignedIn {
                    user_id: user.user_id,
                    session_token,
                })
            }
            None => {
                let signup_token = self.tokens.issue_oauth_signup(
                    email.as_str(),
                    &profile.name,
                    profile.picture.as_deref(),
                )?;
                tracing::info!("Google account without local user, sign-up required");
                Ok(OAuthOutcome::SignUpRequired { signup_token })
            }
        }
    }
}

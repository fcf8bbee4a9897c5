//! Token Check Use Case
//!
//! Lets the front end check a token from a link before showing a form.

use std::sync::Arc;

use crate::application::tokens::TokenService;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{UserId, email::Email};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthCheck {
    /// An account already uses the token's email
    Existing(UserId),
    /// Free to complete the OAuth sign-up
    Available,
}

pub struct TokenCheckUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> TokenCheckUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    /// Any token this service signed and that has not expired
    pub fn verify(&self, token: &str) -> AuthResult<()> {
        self.tokens.verify_any(token)
    }

    pub async fn oauth(&self, token: &str) -> AuthResult<OAuthCheck> {
        let claims = self
            .tokens
            .verify_oauth_signup(token)
            .map_err(|_| AuthError::TokenInvalid)?;

        let email = claims
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or(AuthError::EmailNotFound)?;
        let email = Email::new(&email).map_err(|_| AuthError::EmailNotFound)?;

        match self.repo.find_by_email(&email).await? {
            Some(user) => Ok(OAuthCheck::Existing(user.user_id)),
            None => Ok(OAuthCheck::Available),
        }
    }
}

//! OAuth Register Use Case
//!
//! Completes a Google sign-up: the token from the callback redirect carries
//! the provider profile, the user only chooses a password.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::tokens::TokenService;
use crate::application::validation::FieldErrors;
use crate::domain::entity::{profile_image::ProfileImage, user::User, user_infos::UserInfos};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    UserId,
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_type::UserType,
};
use crate::error::{AuthError, AuthResult};

pub struct OAuthRegisterOutput {
    pub user_id: UserId,
    pub session_token: String,
}

pub struct OAuthRegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> OAuthRegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, token: &str, password: String) -> AuthResult<OAuthRegisterOutput> {
        let mut errors = FieldErrors::new();
        let password = errors.check(RawPassword::new(password));
        errors.finish()?;
        let Some(password) = password else {
            return Err(AuthError::Internal("validation state out of sync".to_string()));
        };

        let claims = self.tokens.verify_oauth_signup(token)?;
        let email = claims
            .email
            .as_deref()
            .and_then(|email| Email::new(email).ok())
            .ok_or(AuthError::EmailNotFound)?;

        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = UserPassword::from_raw(&password, self.config.pepper())?;
        let user = User::new(
            UserName::from_provider(&claims.name),
            email,
            password_hash,
            UserType::Person,
            None,
        );
        let infos = UserInfos::verified(user.user_id);
        let picture = claims
            .profile
            .as_deref()
            .filter(|src| !src.is_empty())
            .map(|src| ProfileImage::new(user.user_id, src));

        self.repo
            .create_user(&user, &infos, picture.as_ref())
            .await?;

        let session_token = self.tokens.issue_session(user.user_id)?;
        tracing::info!(user_id = %user.user_id, "User registered via Google");

        Ok(OAuthRegisterOutput {
            user_id: user.user_id,
            session_token,
        })
    }
}

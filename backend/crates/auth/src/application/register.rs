//! Register Use Case
//!
//! Creates an unverified account and mails a verification code. The
//! returned token is what the front end posts back with the code.

use std::sync::Arc;

use platform::mailer::Mailer;

use crate::application::config::AuthConfig;
use crate::application::mail::verification_mail;
use crate::application::tokens::TokenService;
use crate::application::validation::FieldErrors;
use crate::domain::entity::{user::User, user_infos::UserInfos};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    UserId,
    email::Email,
    sector::Sector,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_type::UserType,
    verification_code::VerificationCode,
};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `person` when absent
    pub user_type: Option<String>,
    pub sector: Option<String>,
}

pub struct RegisterOutput {
    pub user_id: UserId,
    /// Verification token
    pub token: String,
}

pub struct RegisterUseCase<R, M>
where
    R: UserRepository,
    M: Mailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R, M> RegisterUseCase<R, M>
where
    R: UserRepository,
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let mut errors = FieldErrors::new();

        let name = errors.check(UserName::new(&input.name));
        let email = errors.check(Email::new(&input.email));
        let password = errors.check(RawPassword::new(input.password));
        let user_type = match input.user_type.as_deref() {
            None => Some(UserType::default()),
            Some(code) => errors.check(UserType::from_code(code)),
        };
        let sector = match user_type {
            Some(UserType::Organization) => {
                errors.check(Sector::new(input.sector.as_deref().unwrap_or_default()))
            }
            _ => None,
        };

        errors.finish()?;
        let (Some(name), Some(email), Some(password), Some(user_type)) =
            (name, email, password, user_type)
        else {
            return Err(AuthError::Internal("validation state out of sync".to_string()));
        };

        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = UserPassword::from_raw(&password, self.config.pepper())?;
        let user = User::new(name, email, password_hash, user_type, sector);
        let infos = UserInfos::unverified(user.user_id);

        self.repo.create_user(&user, &infos, None).await?;

        let code = VerificationCode::generate();
        self.mailer
            .send(verification_mail(&user.email, &user.name, &code))
            .await?;

        let token = self.tokens.issue_verification(user.user_id, &code)?;

        tracing::info!(
            user_id = %user.user_id,
            user_type = %user.user_type,
            "User registered"
        );

        Ok(RegisterOutput {
            user_id: user.user_id,
            token,
        })
    }
}

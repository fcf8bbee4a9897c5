//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{profile_image::ProfileImage, user::User, user_infos::UserInfos};
use crate::domain::value_object::{UserId, email::Email};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a user together with its account state and, for OAuth
    /// sign-ups, the provider picture. All rows or none.
    async fn create_user(
        &self,
        user: &User,
        infos: &UserInfos,
        profile_image: Option<&ProfileImage>,
    ) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Persist name, bio and profession
    async fn update_profile(&self, user: &User) -> AuthResult<()>;
}

/// Account state repository trait
#[trait_variant::make(UserInfosRepository: Send)]
pub trait LocalUserInfosRepository {
    async fn find_infos(&self, user_id: &UserId) -> AuthResult<Option<UserInfos>>;

    /// Returns `false` when the user has no infos row
    async fn mark_verified(&self, user_id: &UserId) -> AuthResult<bool>;
}

/// Profile image repository trait
#[trait_variant::make(ProfileImageRepository: Send)]
pub trait LocalProfileImageRepository {
    async fn create_profile_image(&self, image: &ProfileImage) -> AuthResult<()>;

    /// Most recently created profile image
    async fn latest_profile_image(&self, user_id: &UserId) -> AuthResult<Option<ProfileImage>>;
}

/// Every repository the HTTP layer needs, on one store
pub trait AuthStore:
    UserRepository + UserInfosRepository + ProfileImageRepository + Send + Sync + 'static
{
}

impl<T> AuthStore for T where
    T: UserRepository + UserInfosRepository + ProfileImageRepository + Send + Sync + 'static
{
}

//! User Profile Use Cases
//!
//! Reading and editing the signed-in user's own profile.

use std::sync::Arc;

use chrono::Utc;
use platform::storage::{UploadStore, extension_of, is_image_mime};

use crate::application::validation::FieldErrors;
use crate::domain::entity::{
    profile_image::ProfileImage,
    user::{ProfileChanges, User},
};
use crate::domain::repository::{ProfileImageRepository, UserInfosRepository, UserRepository};
use crate::domain::value_object::{UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Profile as shown to its owner
#[derive(Debug, Clone)]
pub struct UserView {
    pub user: User,
    pub is_verified: bool,
    /// `src` of the latest profile image
    pub image: Option<String>,
}

// ============================================================================
// Get
// ============================================================================

pub struct GetUserUseCase<R>
where
    R: UserRepository + UserInfosRepository + ProfileImageRepository,
{
    repo: Arc<R>,
}

impl<R> GetUserUseCase<R>
where
    R: UserRepository + UserInfosRepository + ProfileImageRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<UserView> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        let is_verified = self
            .repo
            .find_infos(user_id)
            .await?
            .is_some_and(|infos| infos.is_verified);
        let image = self
            .repo
            .latest_profile_image(user_id)
            .await?
            .map(|image| image.src);

        Ok(UserView {
            user,
            is_verified,
            image,
        })
    }
}

// ============================================================================
// Update
// ============================================================================

#[derive(Debug, Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profession: Option<String>,
}

pub struct UpdateUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Blank fields are ignored; nothing left to change is an error
    pub async fn execute(&self, user_id: &UserId, input: UpdateUserInput) -> AuthResult<User> {
        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut errors = FieldErrors::new();
        let name = non_blank(input.name).and_then(|name| errors.check(UserName::new(name)));
        errors.finish()?;

        let changes = ProfileChanges {
            name,
            bio: non_blank(input.bio),
            profession: non_blank(input.profession),
        };
        if changes.is_empty() {
            return Err(AuthError::NoChanges);
        }

        let mut user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        user.apply(changes);
        self.repo.update_profile(&user).await?;

        tracing::info!(user_id = %user.user_id, "Profile updated");
        Ok(user)
    }
}

// ============================================================================
// Profile image
// ============================================================================

/// One file part of a multipart body
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

pub struct UpdateProfileImageUseCase<R>
where
    R: ProfileImageRepository,
{
    repo: Arc<R>,
    store: Arc<UploadStore>,
}

impl<R> UpdateProfileImageUseCase<R>
where
    R: ProfileImageRepository,
{
    pub fn new(repo: Arc<R>, store: Arc<UploadStore>) -> Self {
        Self { repo, store }
    }

    /// Store the image and record it as the current avatar; returns its `src`
    pub async fn execute(&self, user_id: &UserId, file: Option<UploadedImage>) -> AuthResult<String> {
        let file = file
            .filter(|file| !file.bytes.is_empty())
            .ok_or(AuthError::MissingFile)?;

        let content_type = file.content_type.unwrap_or_default();
        if !is_image_mime(&content_type) {
            return Err(AuthError::UnsupportedMediaType(content_type));
        }

        let file_name = format!(
            "profile-{}-{}{}",
            user_id,
            Utc::now().timestamp_millis(),
            extension_of(file.file_name.as_deref().unwrap_or_default())
        );
        let stored = self
            .store
            .save_named(&format!("files/user-{}", user_id), &file_name, &file.bytes)
            .await?;

        let image = ProfileImage::new(*user_id, stored.src.clone());
        if let Err(e) = self.repo.create_profile_image(&image).await {
            self.store.remove(&stored.src).await;
            return Err(e);
        }

        tracing::info!(user_id = %user_id, src = %stored.src, "Profile image updated");
        Ok(stored.src)
    }
}

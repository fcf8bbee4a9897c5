//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{profile_image::ProfileImage, user::User, user_infos::UserInfos};
pub use repository::{AuthStore, ProfileImageRepository, UserInfosRepository, UserRepository};

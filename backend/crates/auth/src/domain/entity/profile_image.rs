//! Profile Image Entity
//!
//! A `files` row of type `profile`. The newest one is the current avatar.

use chrono::{DateTime, Utc};
use kernel::id::MediaFileId;

use crate::domain::value_object::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileImage {
    pub file_id: MediaFileId,
    pub user_id: UserId,
    /// `uploads/...` for stored uploads, a full URL for OAuth pictures
    pub src: String,
    pub created_at: DateTime<Utc>,
}

impl ProfileImage {
    pub fn new(user_id: UserId, src: impl Into<String>) -> Self {
        Self {
            file_id: MediaFileId::new(),
            user_id,
            src: src.into(),
            created_at: Utc::now(),
        }
    }
}

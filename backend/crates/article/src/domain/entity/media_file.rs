//! Media File Entity
//!
//! A `files` row of type `media`, attached to one section.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{MediaFileId, SectionId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_id: MediaFileId,
    /// Public path, `uploads/...`
    pub src: String,
    pub user_id: UserId,
    pub section_id: SectionId,
    /// Order inside the article
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl MediaFile {
    pub fn new(user_id: UserId, section_id: SectionId, position: i32, src: impl Into<String>) -> Self {
        Self {
            file_id: MediaFileId::new(),
            src: src.into(),
            user_id,
            section_id,
            position,
            created_at: Utc::now(),
        }
    }
}

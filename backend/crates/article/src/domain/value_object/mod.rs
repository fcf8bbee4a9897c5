//! Value Object Module

pub mod article_title;
pub mod section_content;

pub use kernel::id::{ArticleId, MediaFileId, SectionId, UserId};

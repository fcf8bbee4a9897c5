//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    article::{Article, ArticleDetail, SectionDetail},
    media_file::MediaFile,
    section::Section,
};
pub use repository::ArticleRepository;

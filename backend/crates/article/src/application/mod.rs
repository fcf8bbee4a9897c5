//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod create;
pub mod delete;
pub mod form;
mod media;
pub mod query;
pub mod update;

// Re-exports
pub use config::ArticleConfig;
pub use create::CreateArticleUseCase;
pub use delete::{DeleteArticleUseCase, DeletedArticle};
pub use form::{ArticleForm, SectionInput, UploadedFile};
pub use query::{GetArticleUseCase, ListArticlesUseCase};
pub use update::UpdateArticleUseCase;

//! Article Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, form validation, configuration
//! - `infra/` - PostgreSQL repository
//! - `presentation/` - HTTP handlers, DTOs, multipart parsing, router
//!
//! ## Features
//! - Articles made of ordered sections, each with ordered media files
//! - Multipart creation and edition, files stored under the upload root
//! - Public reads; writes restricted to the signed-in author

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::ArticleConfig;
pub use error::{ArticleError, ArticleResult};
pub use infra::postgres::PgArticleRepository;
pub use presentation::{ArticleAppState, article_router, article_router_generic};

pub mod models {
    pub use crate::domain::entity::article::*;
    pub use crate::domain::entity::media_file::*;
    pub use crate::domain::entity::section::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

//! Presentation Layer
//!
//! HTTP handlers, DTOs, multipart form parsing and the router.

pub mod dto;
pub mod form;
pub mod handlers;
pub mod router;

pub use handlers::ArticleAppState;
pub use router::{article_router, article_router_generic};

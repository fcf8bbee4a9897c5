//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod google;
pub mod postgres;

pub use google::{AppOAuthProvider, GoogleOAuthClient};
pub use postgres::PgAuthRepository;

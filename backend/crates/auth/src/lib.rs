//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, token service, configuration
//! - `infra/` - PostgreSQL repository and Google OAuth client
//! - `presentation/` - HTTP handlers, DTOs, routers, session middleware
//!
//! ## Features
//! - Registration for persons and organizations with email verification codes
//! - Email + password login, optional persistent cookie
//! - Google OAuth sign-in and sign-up
//! - Profile edition and profile image upload
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Stateless JWT sessions in an HttpOnly cookie
//! - Verification tokens carry an HMAC of the code keyed with the server secret
//! - OAuth `state` bound to the browser through a short-lived cookie

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{AuthConfig, GoogleOAuthConfig};
pub use error::{AuthError, AuthResult};
pub use infra::{google::AppOAuthProvider, postgres::PgAuthRepository};
pub use presentation::handlers::AuthAppState;
pub use presentation::router::{
    PgAuthAppState, auth_router, oauth_router, token_router, user_router, with_required_session,
    with_session,
};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
pub use kernel::session::CurrentUser;

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

//! Presentation Layer
//!
//! HTTP handlers, DTOs, routers, and session middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{AuthMiddlewareState, require_auth, resolve_session};
pub use router::{
    PgAuthAppState, auth_router, auth_router_generic, oauth_router, oauth_router_generic,
    token_router, token_router_generic, user_router, user_router_generic, with_required_session,
    with_session,
};

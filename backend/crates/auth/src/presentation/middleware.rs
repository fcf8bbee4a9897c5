//! Auth Middleware
//!
//! Resolves the session cookie into a [`CurrentUser`] request extension.

use axum::body::Body;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::session::CurrentUser;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::tokens::TokenService;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Middleware state
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AuthConfig>,
}

impl<R> Clone for AuthMiddlewareState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R> AuthMiddlewareState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    /// Session token from the configured cookie
    fn token(&self, req: &Request<Body>) -> Option<String> {
        platform::cookie::extract_cookie(req.headers(), &self.config.cookie_name)
            .filter(|token| !token.is_empty())
    }

    /// Verify a session token and load its user
    async fn resolve(&self, token: &str) -> AuthResult<CurrentUser> {
        let user_id = self.tokens.verify_session(token)?;
        let user = self
            .repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        Ok(CurrentUser {
            user_id: user.user_id,
            user_type: user.user_type.code(),
        })
    }
}

/// Middleware that requires a valid session
///
/// A cookie that no longer resolves is cleared in the 401 response.
pub async fn require_auth<R>(
    state: AuthMiddlewareState<R>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + Send + Sync + 'static,
{
    let Some(token) = state.token(&req) else {
        return Err(AuthError::NotAuthenticated.into_response());
    };

    match state.resolve(&token).await {
        Ok(current) => {
            req.extensions_mut().insert(current);
            Ok(next.run(req).await)
        }
        Err(e @ (AuthError::Database(_) | AuthError::Internal(_))) => Err(e.into_response()),
        Err(_) => {
            let clear = state.config.session_cookie(false).build_delete_cookie();
            Err((
                [(header::SET_COOKIE, clear)],
                AuthError::SessionInvalid,
            )
                .into_response())
        }
    }
}

/// Middleware that resolves the session when present but never rejects
pub async fn resolve_session<R>(
    state: AuthMiddlewareState<R>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: UserRepository + Send + Sync + 'static,
{
    if let Some(token) = state.token(&req) {
        match state.resolve(&token).await {
            Ok(current) => {
                req.extensions_mut().insert(current);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Session cookie ignored");
            }
        }
    }

    next.run(req).await
}

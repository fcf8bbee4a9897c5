//! Auth Routers
//!
//! One router per mount point: `/api/auth`, `/api/token`,
//! `/api/oauth/google` and `/api/user`.

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{Next, from_fn},
    routing::{get, post, put},
};
use platform::mailer::{AppMailer, Mailer};

use crate::application::google_oauth::OAuthProvider;
use crate::domain::repository::{AuthStore, UserRepository};
use crate::infra::{google::AppOAuthProvider, postgres::PgAuthRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_auth, resolve_session};

/// Production state: PostgreSQL, SMTP (or log) mailer, Google (or disabled) OAuth
pub type PgAuthAppState = AuthAppState<PgAuthRepository, AppMailer, AppOAuthProvider>;

impl<R, M, P> AuthAppState<R, M, P>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    /// State for the session middlewares, sharing this state's repository
    pub fn middleware_state(&self) -> AuthMiddlewareState<R> {
        AuthMiddlewareState {
            repo: self.repo.clone(),
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

/// Reject requests without a valid session; handlers see a `CurrentUser`
pub fn with_required_session<S, R>(router: Router<S>, state: AuthMiddlewareState<R>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    R: UserRepository + Send + Sync + 'static,
{
    router.layer(from_fn(move |req: Request<Body>, next: Next| {
        require_auth(state.clone(), req, next)
    }))
}

/// Attach a `CurrentUser` when the session cookie is valid
pub fn with_session<S, R>(router: Router<S>, state: AuthMiddlewareState<R>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    R: UserRepository + Send + Sync + 'static,
{
    router.layer(from_fn(move |req: Request<Body>, next: Next| {
        resolve_session(state.clone(), req, next)
    }))
}

// ============================================================================
// PostgreSQL routers
// ============================================================================

/// `/api/auth` with the production state
pub fn auth_router(state: PgAuthAppState) -> Router {
    auth_router_generic(state)
}

/// `/api/token` with the production state
pub fn token_router(state: PgAuthAppState) -> Router {
    token_router_generic(state)
}

/// `/api/oauth/google` with the production state
pub fn oauth_router(state: PgAuthAppState) -> Router {
    oauth_router_generic(state)
}

/// `/api/user` with the production state
pub fn user_router(state: PgAuthAppState) -> Router {
    user_router_generic(state)
}

// ============================================================================
// Generic routers
// ============================================================================

pub fn auth_router_generic<R, M, P>(state: AuthAppState<R, M, P>) -> Router
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    let session = with_required_session(
        Router::<AuthAppState<R, M, P>>::new().route("/jwt", get(handlers::session)),
        state.middleware_state(),
    );

    Router::new()
        .route("/register", post(handlers::register::<R, M, P>))
        .route("/register/{token}", post(handlers::oauth_register::<R, M, P>))
        .route("/login", post(handlers::login::<R, M, P>))
        .route("/logout", get(handlers::logout::<R, M, P>))
        .merge(session)
        .with_state(state)
}

pub fn token_router_generic<R, M, P>(state: AuthAppState<R, M, P>) -> Router
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    Router::new()
        .route("/{token}", get(handlers::check_token::<R, M, P>))
        .route("/{token}/code", post(handlers::verify_code::<R, M, P>))
        .route("/{token}/oauth", get(handlers::check_oauth_token::<R, M, P>))
        .with_state(state)
}

pub fn oauth_router_generic<R, M, P>(state: AuthAppState<R, M, P>) -> Router
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::google_start::<R, M, P>))
        .route("/callback", get(handlers::google_callback::<R, M, P>))
        .with_state(state)
}

pub fn user_router_generic<R, M, P>(state: AuthAppState<R, M, P>) -> Router
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    let middleware = state.middleware_state();

    let router = Router::new()
        .route(
            "/",
            get(handlers::get_user::<R, M, P>).put(handlers::update_user::<R, M, P>),
        )
        .route("/profile", put(handlers::update_profile_image::<R, M, P>));

    with_required_session(router, middleware).with_state(state)
}

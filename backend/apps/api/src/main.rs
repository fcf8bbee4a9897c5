//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use article::{PgArticleRepository, article_router};
use auth::{
    AppOAuthProvider, PgAuthAppState, PgAuthRepository, auth_router, oauth_router, token_router,
    user_router, with_session,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{self, HeaderName, Method, header},
    routing::get,
};
use platform::mailer::AppMailer;
use platform::storage::UploadStore;
use presence::{PresenceHub, presence_router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer, ExposeHeaders};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const SESSION_ID_HEADER: HeaderName = HeaderName::from_static("sessionid");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,article=info,presence=info,platform=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await
        .context("Failed to connect to the database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    tokio::fs::create_dir_all(&settings.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", settings.upload_dir))?;

    // Auth
    let mailer = AppMailer::from_config(&settings.mail)?;
    let oauth = AppOAuthProvider::from_config(settings.auth.google.as_ref())?;
    if settings.auth.google.is_none() {
        tracing::warn!("Google OAuth credentials not set, Google sign-in disabled");
    }
    let auth_state: PgAuthAppState = PgAuthAppState::new(
        PgAuthRepository::new(pool.clone()),
        mailer,
        oauth,
        UploadStore::new(&settings.upload_dir),
        settings.auth.clone(),
    );

    // Articles: public reads, session attached when present
    let articles = with_session(
        article_router(
            PgArticleRepository::new(pool.clone()),
            UploadStore::new(&settings.upload_dir),
            settings.article(),
        ),
        auth_state.middleware_state(),
    );

    let presence = Arc::new(PresenceHub::default());

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = settings
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            SESSION_ID_HEADER,
        ]))
        .expose_headers(ExposeHeaders::list([SESSION_ID_HEADER]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .route("/", get(|| async { "Backend running successfully!" }))
        .nest("/api/auth", auth_router(auth_state.clone()))
        .nest("/api/token", token_router(auth_state.clone()))
        .nest("/api/oauth/google", oauth_router(auth_state.clone()))
        .nest("/api/user", user_router(auth_state))
        .nest("/api/article", articles)
        .nest("/socket", presence_router(presence))
        .nest_service("/uploads", ServeDir::new(&settings.upload_dir))
        .layer(DefaultBodyLimit::max(settings.upload_max_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}

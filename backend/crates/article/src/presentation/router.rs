//! Article Router

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use platform::storage::UploadStore;

use crate::application::config::ArticleConfig;
use crate::domain::repository::ArticleRepository;
use crate::infra::postgres::PgArticleRepository;
use crate::presentation::handlers::{self, ArticleAppState};

/// `/api/article` backed by PostgreSQL
pub fn article_router(
    repo: PgArticleRepository,
    store: UploadStore,
    config: ArticleConfig,
) -> Router {
    article_router_generic(ArticleAppState::new(repo, store, config))
}

/// Writes need a `CurrentUser` in the request extensions; mount behind
/// the session middleware.
pub fn article_router_generic<R>(state: ArticleAppState<R>) -> Router
where
    R: ArticleRepository + Send + Sync + 'static,
{
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route(
            "/",
            get(handlers::list_articles::<R>).post(handlers::create_article::<R>),
        )
        .route(
            "/{id}",
            get(handlers::get_article::<R>)
                .put(handlers::update_article::<R>)
                .delete(handlers::delete_article::<R>),
        )
        .layer(body_limit)
        .with_state(state)
}

//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use kernel::session::CurrentUser;
use platform::storage::UploadStore;

use crate::application::{
    ArticleConfig, CreateArticleUseCase, DeleteArticleUseCase, GetArticleUseCase,
    ListArticlesUseCase, UpdateArticleUseCase,
};
use crate::domain::repository::ArticleRepository;
use crate::error::ArticleResult;
use crate::presentation::dto::{ArticleDto, ArticleResponse, ArticlesResponse, DeletedResponse};
use crate::presentation::form::read_article_form;

/// Shared state for article handlers
pub struct ArticleAppState<R>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub store: Arc<UploadStore>,
    pub config: Arc<ArticleConfig>,
}

impl<R> Clone for ArticleAppState<R>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R> ArticleAppState<R>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    pub fn new(repo: R, store: UploadStore, config: ArticleConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Write
// ============================================================================

/// POST /api/article
pub async fn create_article<R>(
    State(state): State<ArticleAppState<R>>,
    current: CurrentUser,
    multipart: Multipart,
) -> ArticleResult<(StatusCode, Json<ArticleResponse>)>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    let form = read_article_form(multipart, state.config.max_files).await?;

    let use_case = CreateArticleUseCase::new(
        state.repo.clone(),
        state.store.clone(),
        state.config.clone(),
    );
    let detail = use_case.execute(&current.user_id, form).await?;

    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// PUT /api/article/{id}
pub async fn update_article<R>(
    State(state): State<ArticleAppState<R>>,
    current: CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ArticleResult<Json<ArticleResponse>>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    let form = read_article_form(multipart, state.config.max_files).await?;

    let use_case = UpdateArticleUseCase::new(
        state.repo.clone(),
        state.store.clone(),
        state.config.clone(),
    );
    let detail = use_case.execute(&current.user_id, &id, form).await?;

    Ok(Json(detail.into()))
}

/// DELETE /api/article/{id}
pub async fn delete_article<R>(
    State(state): State<ArticleAppState<R>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ArticleResult<Json<DeletedResponse>>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    let use_case = DeleteArticleUseCase::new(state.repo.clone(), state.store.clone());
    let deleted = use_case.execute(&current.user_id, &id).await?;

    Ok(Json(deleted.into()))
}

// ============================================================================
// Read
// ============================================================================

/// GET /api/article
pub async fn list_articles<R>(
    State(state): State<ArticleAppState<R>>,
) -> ArticleResult<Json<ArticlesResponse>>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    let use_case = ListArticlesUseCase::new(state.repo.clone());
    let articles = use_case.execute().await?;

    Ok(Json(ArticlesResponse {
        articles: articles.into_iter().map(ArticleDto::from).collect(),
    }))
}

/// GET /api/article/{id}
pub async fn get_article<R>(
    State(state): State<ArticleAppState<R>>,
    Path(id): Path<String>,
) -> ArticleResult<Json<ArticleResponse>>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    let use_case = GetArticleUseCase::new(state.repo.clone());
    let detail = use_case.execute(&id).await?;

    Ok(Json(detail.into()))
}

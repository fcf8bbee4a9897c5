//! Delete Article Use Case

use std::sync::Arc;

use platform::storage::UploadStore;

use crate::domain::repository::ArticleRepository;
use crate::domain::value_object::{ArticleId, UserId};
use crate::error::{ArticleError, ArticleResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedArticle {
    pub article_id: ArticleId,
    pub title: String,
}

pub struct DeleteArticleUseCase<R>
where
    R: ArticleRepository,
{
    repo: Arc<R>,
    store: Arc<UploadStore>,
}

impl<R> DeleteArticleUseCase<R>
where
    R: ArticleRepository,
{
    pub fn new(repo: Arc<R>, store: Arc<UploadStore>) -> Self {
        Self { repo, store }
    }

    pub async fn execute(&self, user_id: &UserId, raw_id: &str) -> ArticleResult<DeletedArticle> {
        let article_id: ArticleId = raw_id.parse()?;

        let detail = self
            .repo
            .find_article(&article_id)
            .await?
            .ok_or(ArticleError::ArticleNotFound)?;
        if !detail.article.is_owned_by(user_id) {
            return Err(ArticleError::NotOwner);
        }

        if !self.repo.delete_article(&article_id).await? {
            return Err(ArticleError::ArticleNotFound);
        }

        // Rows are gone; leftover files only waste disk
        for src in detail.file_sources() {
            self.store.remove(src).await;
        }

        tracing::info!(article_id = %article_id, user_id = %user_id, "Article deleted");

        Ok(DeletedArticle {
            article_id,
            title: detail.article.title.as_str().to_string(),
        })
    }
}

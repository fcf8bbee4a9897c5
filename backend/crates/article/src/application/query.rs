//! Article read use cases

use std::sync::Arc;

use crate::domain::entity::article::ArticleDetail;
use crate::domain::repository::ArticleRepository;
use crate::domain::value_object::ArticleId;
use crate::error::{ArticleError, ArticleResult};

pub struct ListArticlesUseCase<R>
where
    R: ArticleRepository,
{
    repo: Arc<R>,
}

impl<R> ListArticlesUseCase<R>
where
    R: ArticleRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> ArticleResult<Vec<ArticleDetail>> {
        self.repo.list_articles().await
    }
}

pub struct GetArticleUseCase<R>
where
    R: ArticleRepository,
{
    repo: Arc<R>,
}

impl<R> GetArticleUseCase<R>
where
    R: ArticleRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// `raw_id` comes straight from the path
    pub async fn execute(&self, raw_id: &str) -> ArticleResult<ArticleDetail> {
        let article_id: ArticleId = raw_id.parse()?;

        self.repo
            .find_article(&article_id)
            .await?
            .ok_or(ArticleError::ArticleNotFound)
    }
}

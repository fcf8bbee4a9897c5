//! Create Article Use Case

use std::sync::Arc;

use platform::storage::UploadStore;

use crate::application::config::ArticleConfig;
use crate::application::form::ArticleForm;
use crate::application::media::store_files;
use crate::domain::entity::{article::{Article, ArticleDetail}, section::Section};
use crate::domain::repository::ArticleRepository;
use crate::domain::value_object::UserId;
use crate::error::{ArticleError, ArticleResult};

pub struct CreateArticleUseCase<R>
where
    R: ArticleRepository,
{
    repo: Arc<R>,
    store: Arc<UploadStore>,
    config: Arc<ArticleConfig>,
}

impl<R> CreateArticleUseCase<R>
where
    R: ArticleRepository,
{
    pub fn new(repo: Arc<R>, store: Arc<UploadStore>, config: Arc<ArticleConfig>) -> Self {
        Self {
            repo,
            store,
            config,
        }
    }

    /// File `i` goes to section `i % sections.len()`
    pub async fn execute(&self, user_id: &UserId, form: ArticleForm) -> ArticleResult<ArticleDetail> {
        let valid = form.validate()?;

        let article = Article::new(*user_id, valid.title);
        let sections: Vec<Section> = valid
            .sections
            .into_iter()
            .enumerate()
            .map(|(position, (_, content))| {
                Section::new(article.article_id, *user_id, position as i32, content)
            })
            .collect();

        let targets: Vec<_> = form
            .non_empty_files()
            .enumerate()
            .map(|(i, file)| (sections[i % sections.len()].section_id, file))
            .collect();
        let files = store_files(&self.store, &self.config, user_id, targets, 0).await?;

        if let Err(e) = self.repo.create_article(&article, &sections, &files).await {
            for file in &files {
                self.store.remove(&file.src).await;
            }
            return Err(e);
        }

        tracing::info!(
            article_id = %article.article_id,
            user_id = %user_id,
            sections = sections.len(),
            files = files.len(),
            "Article created"
        );

        self.repo
            .find_article(&article.article_id)
            .await?
            .ok_or_else(|| ArticleError::Internal("created article not readable".to_string()))
    }
}

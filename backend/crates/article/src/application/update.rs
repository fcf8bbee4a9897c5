//! Update Article Use Case

use std::sync::Arc;

use platform::storage::UploadStore;

use crate::application::config::ArticleConfig;
use crate::application::form::{ArticleForm, parse_section_id};
use crate::application::media::store_files;
use crate::domain::entity::article::ArticleDetail;
use crate::domain::repository::ArticleRepository;
use crate::domain::value_object::{ArticleId, UserId};
use crate::error::{ArticleError, ArticleResult};

pub struct UpdateArticleUseCase<R>
where
    R: ArticleRepository,
{
    repo: Arc<R>,
    store: Arc<UploadStore>,
    config: Arc<ArticleConfig>,
}

impl<R> UpdateArticleUseCase<R>
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

    /// Owner only. Listed sections of other articles are skipped; file `i`
    /// goes to `sections[i].id`, which must be a section of this article.
    /// Unlisted sections keep their content.
    pub async fn execute(
        &self,
        user_id: &UserId,
        raw_id: &str,
        form: ArticleForm,
    ) -> ArticleResult<ArticleDetail> {
        let article_id: ArticleId = raw_id.parse()?;

        let current = self
            .repo
            .find_article(&article_id)
            .await?
            .ok_or(ArticleError::ArticleNotFound)?;
        if !current.article.is_owned_by(user_id) {
            return Err(ArticleError::NotOwner);
        }

        let valid = form.validate_update()?;

        let section_ids: Vec<_> = valid
            .sections
            .iter()
            .map(|(id, _)| parse_section_id(id.as_deref()))
            .collect();

        let updates: Vec<_> = section_ids
            .iter()
            .zip(&valid.sections)
            .filter_map(|(id, (_, content))| (*id).map(|id| (id, content.clone())))
            .collect();

        let mut targets = Vec::new();
        for (index, file) in form.non_empty_files().enumerate() {
            let section_id = section_ids
                .get(index)
                .copied()
                .flatten()
                .filter(|id| current.has_section(id))
                .ok_or(ArticleError::FileWithoutSection { index })?;
            targets.push((section_id, file));
        }

        let first_position = current.file_count() as i32;
        let files = store_files(&self.store, &self.config, user_id, targets, first_position).await?;

        if let Err(e) = self
            .repo
            .update_article(&article_id, user_id, &valid.title, &updates, &files)
            .await
        {
            for file in &files {
                self.store.remove(&file.src).await;
            }
            return Err(e);
        }

        tracing::info!(
            article_id = %article_id,
            user_id = %user_id,
            files = files.len(),
            "Article updated"
        );

        self.repo
            .find_article(&article_id)
            .await?
            .ok_or(ArticleError::ArticleNotFound)
    }
}

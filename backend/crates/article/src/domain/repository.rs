//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{
    article::{Article, ArticleDetail},
    media_file::MediaFile,
    section::Section,
};
use crate::domain::value_object::{
    ArticleId, SectionId, UserId, article_title::ArticleTitle, section_content::SectionContent,
};
use crate::error::ArticleResult;

/// Article repository trait
#[trait_variant::make(ArticleRepository: Send)]
pub trait LocalArticleRepository {
    /// Article, sections and files in one transaction
    async fn create_article(
        &self,
        article: &Article,
        sections: &[Section],
        files: &[MediaFile],
    ) -> ArticleResult<()>;

    /// Newest first
    async fn list_articles(&self) -> ArticleResult<Vec<ArticleDetail>>;

    async fn find_article(&self, article_id: &ArticleId) -> ArticleResult<Option<ArticleDetail>>;

    /// New title, section contents and extra files in one transaction.
    /// Section updates only touch rows of this article owned by `owner`.
    async fn update_article(
        &self,
        article_id: &ArticleId,
        owner: &UserId,
        title: &ArticleTitle,
        sections: &[(SectionId, SectionContent)],
        files: &[MediaFile],
    ) -> ArticleResult<()>;

    /// `false` when nothing was deleted
    async fn delete_article(&self, article_id: &ArticleId) -> ArticleResult<bool>;
}

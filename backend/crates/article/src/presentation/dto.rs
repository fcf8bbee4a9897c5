//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::delete::DeletedArticle;
use crate::domain::entity::article::{ArticleDetail, SectionDetail};
use crate::domain::value_object::{ArticleId, SectionId, UserId};

#[derive(Debug, Clone, Serialize)]
pub struct FileDto {
    pub src: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionDto {
    pub id: SectionId,
    pub content: String,
    pub files: Vec<FileDto>,
}

impl From<SectionDetail> for SectionDto {
    fn from(detail: SectionDetail) -> Self {
        Self {
            id: detail.section.section_id,
            content: detail.section.content.as_str().to_string(),
            files: detail
                .files
                .into_iter()
                .map(|file| FileDto { src: file.src })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDto {
    pub id: ArticleId,
    pub title: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub sections: Vec<SectionDto>,
}

impl From<ArticleDetail> for ArticleDto {
    fn from(detail: ArticleDetail) -> Self {
        Self {
            id: detail.article.article_id,
            title: detail.article.title.as_str().to_string(),
            user_id: detail.article.user_id,
            created_at: detail.article.created_at,
            sections: detail.sections.into_iter().map(SectionDto::from).collect(),
        }
    }
}

/// `{article: {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct ArticleResponse {
    pub article: ArticleDto,
}

impl From<ArticleDetail> for ArticleResponse {
    fn from(detail: ArticleDetail) -> Self {
        Self {
            article: detail.into(),
        }
    }
}

/// `{articles: [...]}`
#[derive(Debug, Clone, Serialize)]
pub struct ArticlesResponse {
    pub articles: Vec<ArticleDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedBody {
    pub id: ArticleId,
    pub title: String,
}

/// `{deleted: {id, title}}`
#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
    pub deleted: DeletedBody,
}

impl From<DeletedArticle> for DeletedResponse {
    fn from(deleted: DeletedArticle) -> Self {
        Self {
            deleted: DeletedBody {
                id: deleted.article_id,
                title: deleted.title,
            },
        }
    }
}

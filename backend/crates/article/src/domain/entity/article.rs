//! Article Entity

use chrono::{DateTime, Utc};

use crate::domain::entity::{media_file::MediaFile, section::Section};
use crate::domain::value_object::{ArticleId, SectionId, UserId, article_title::ArticleTitle};

#[derive(Debug, Clone)]
pub struct Article {
    pub article_id: ArticleId,
    /// Owner, the only user allowed to modify or delete it
    pub user_id: UserId,
    pub title: ArticleTitle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn new(user_id: UserId, title: ArticleTitle) -> Self {
        let now = Utc::now();
        Self {
            article_id: ArticleId::new(),
            user_id,
            title,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }
}

/// A section with its files, both in position order
#[derive(Debug, Clone)]
pub struct SectionDetail {
    pub section: Section,
    pub files: Vec<MediaFile>,
}

/// Read model: an article with everything it displays
#[derive(Debug, Clone)]
pub struct ArticleDetail {
    pub article: Article,
    pub sections: Vec<SectionDetail>,
}

impl ArticleDetail {
    pub fn has_section(&self, section_id: &SectionId) -> bool {
        self.sections
            .iter()
            .any(|detail| detail.section.section_id == *section_id)
    }

    pub fn file_count(&self) -> usize {
        self.sections.iter().map(|detail| detail.files.len()).sum()
    }

    /// Every stored file `src` of the article
    pub fn file_sources(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|detail| detail.files.iter().map(|file| file.src.as_str()))
    }
}

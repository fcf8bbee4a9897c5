//! Section Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{ArticleId, SectionId, UserId, section_content::SectionContent};

#[derive(Debug, Clone)]
pub struct Section {
    pub section_id: SectionId,
    pub article_id: ArticleId,
    pub user_id: UserId,
    /// 0-based, unique per article
    pub position: i32,
    pub content: SectionContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Section {
    pub fn new(article_id: ArticleId, user_id: UserId, position: i32, content: SectionContent) -> Self {
        let now = Utc::now();
        Self {
            section_id: SectionId::new(),
            article_id,
            user_id,
            position,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

//! PostgreSQL Repository Implementation

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::entity::{
    article::{Article, ArticleDetail, SectionDetail},
    media_file::MediaFile,
    section::Section,
};
use crate::domain::repository::ArticleRepository;
use crate::domain::value_object::{
    ArticleId, MediaFileId, SectionId, UserId, article_title::ArticleTitle,
    section_content::SectionContent,
};
use crate::error::ArticleResult;

/// `files.file_type` of article media
const MEDIA_FILE_TYPE: &str = "media";

/// PostgreSQL-backed article repository
#[derive(Clone)]
pub struct PgArticleRepository {
    pool: PgPool,
}

impl PgArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Sections and files of `articles`, assembled in position order
    async fn load_details(&self, articles: Vec<ArticleRow>) -> ArticleResult<Vec<ArticleDetail>> {
        if articles.is_empty() {
            return Ok(Vec::new());
        }

        let article_ids: Vec<Uuid> = articles.iter().map(|a| a.article_id).collect();

        let sections = sqlx::query_as::<_, SectionRow>(
            r#"
            SELECT section_id, article_id, user_id, position, content, created_at, updated_at
            FROM sections
            WHERE article_id = ANY($1)
            ORDER BY article_id, position
            "#,
        )
        .bind(&article_ids)
        .fetch_all(&self.pool)
        .await?;

        let section_ids: Vec<Uuid> = sections.iter().map(|s| s.section_id).collect();

        let files = sqlx::query_as::<_, MediaFileRow>(
            r#"
            SELECT file_id, src, user_id, section_id, position, created_at
            FROM files
            WHERE section_id = ANY($1) AND file_type = $2
            ORDER BY position, created_at
            "#,
        )
        .bind(&section_ids)
        .bind(MEDIA_FILE_TYPE)
        .fetch_all(&self.pool)
        .await?;

        let mut files_by_section: HashMap<Uuid, Vec<MediaFile>> = HashMap::new();
        for row in files {
            files_by_section
                .entry(row.section_id)
                .or_default()
                .push(row.into_media_file());
        }

        let mut sections_by_article: HashMap<Uuid, Vec<SectionDetail>> = HashMap::new();
        for row in sections {
            let files = files_by_section.remove(&row.section_id).unwrap_or_default();
            sections_by_article
                .entry(row.article_id)
                .or_default()
                .push(SectionDetail {
                    section: row.into_section(),
                    files,
                });
        }

        Ok(articles
            .into_iter()
            .map(|row| ArticleDetail {
                sections: sections_by_article
                    .remove(&row.article_id)
                    .unwrap_or_default(),
                article: row.into_article(),
            })
            .collect())
    }
}

async fn insert_media_files(conn: &mut PgConnection, files: &[MediaFile]) -> Result<(), sqlx::Error> {
    for file in files {
        sqlx::query(
            r#"
            INSERT INTO files (file_id, src, file_type, user_id, section_id, position, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            "#,
        )
        .bind(file.file_id.as_uuid())
        .bind(&file.src)
        .bind(MEDIA_FILE_TYPE)
        .bind(file.user_id.as_uuid())
        .bind(file.section_id.as_uuid())
        .bind(file.position)
        .bind(file.created_at)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// ============================================================================
// Article Repository Implementation
// ============================================================================

impl ArticleRepository for PgArticleRepository {
    async fn create_article(
        &self,
        article: &Article,
        sections: &[Section],
        files: &[MediaFile],
    ) -> ArticleResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO articles (article_id, user_id, title, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(article.article_id.as_uuid())
        .bind(article.user_id.as_uuid())
        .bind(article.title.as_str())
        .bind(article.created_at)
        .bind(article.updated_at)
        .execute(&mut *tx)
        .await?;

        for section in sections {
            sqlx::query(
                r#"
                INSERT INTO sections (
                    section_id,
                    article_id,
                    user_id,
                    position,
                    content,
                    created_at,
                    updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(section.section_id.as_uuid())
            .bind(section.article_id.as_uuid())
            .bind(section.user_id.as_uuid())
            .bind(section.position)
            .bind(section.content.as_str())
            .bind(section.created_at)
            .bind(section.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        insert_media_files(&mut *tx, files).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_articles(&self) -> ArticleResult<Vec<ArticleDetail>> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT article_id, user_id, title, created_at, updated_at
            FROM articles
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.load_details(rows).await
    }

    async fn find_article(&self, article_id: &ArticleId) -> ArticleResult<Option<ArticleDetail>> {
        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT article_id, user_id, title, created_at, updated_at
            FROM articles
            WHERE article_id = $1
            "#,
        )
        .bind(article_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.load_details(vec![row]).await?.pop())
    }

    async fn update_article(
        &self,
        article_id: &ArticleId,
        owner: &UserId,
        title: &ArticleTitle,
        sections: &[(SectionId, SectionContent)],
        files: &[MediaFile],
    ) -> ArticleResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE articles SET
                title = $2,
                updated_at = NOW()
            WHERE article_id = $1
            "#,
        )
        .bind(article_id.as_uuid())
        .bind(title.as_str())
        .execute(&mut *tx)
        .await?;

        for (section_id, content) in sections {
            sqlx::query(
                r#"
                UPDATE sections SET
                    content = $4,
                    updated_at = NOW()
                WHERE section_id = $1 AND article_id = $2 AND user_id = $3
                "#,
            )
            .bind(section_id.as_uuid())
            .bind(article_id.as_uuid())
            .bind(owner.as_uuid())
            .bind(content.as_str())
            .execute(&mut *tx)
            .await?;
        }

        insert_media_files(&mut *tx, files).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_article(&self, article_id: &ArticleId) -> ArticleResult<bool> {
        let deleted = sqlx::query("DELETE FROM articles WHERE article_id = $1")
            .bind(article_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct ArticleRow {
    article_id: Uuid,
    user_id: Uuid,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ArticleRow {
    fn into_article(self) -> Article {
        Article {
            article_id: ArticleId::from_uuid(self.article_id),
            user_id: UserId::from_uuid(self.user_id),
            title: ArticleTitle::from_db(self.title),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SectionRow {
    section_id: Uuid,
    article_id: Uuid,
    user_id: Uuid,
    position: i32,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SectionRow {
    fn into_section(self) -> Section {
        Section {
            section_id: SectionId::from_uuid(self.section_id),
            article_id: ArticleId::from_uuid(self.article_id),
            user_id: UserId::from_uuid(self.user_id),
            position: self.position,
            content: SectionContent::from_db(self.content),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MediaFileRow {
    file_id: Uuid,
    src: String,
    user_id: Uuid,
    section_id: Uuid,
    position: i32,
    created_at: DateTime<Utc>,
}

impl MediaFileRow {
    fn into_media_file(self) -> MediaFile {
        MediaFile {
            file_id: MediaFileId::from_uuid(self.file_id),
            src: self.src,
            user_id: UserId::from_uuid(self.user_id),
            section_id: SectionId::from_uuid(self.section_id),
            position: self.position,
            created_at: self.created_at,
        }
    }
}

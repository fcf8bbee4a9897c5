//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::MediaFileId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    profile_image::ProfileImage,
    user::User,
    user_infos::UserInfos,
};
use crate::domain::repository::{ProfileImageRepository, UserInfosRepository, UserRepository};
use crate::domain::value_object::{
    UserId, email::Email, sector::Sector, user_name::UserName, user_password::UserPassword,
    user_type::UserType,
};
use crate::error::{AuthError, AuthResult};

/// `files.file_type` of profile images
const PROFILE_FILE_TYPE: &str = "profile";

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(err: sqlx::Error) -> AuthError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::UserAlreadyExists,
        _ => AuthError::Database(err),
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create_user(
        &self,
        user: &User,
        infos: &UserInfos,
        profile_image: Option<&ProfileImage>,
    ) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                name,
                email,
                password_hash,
                user_type,
                sector,
                bio,
                profession,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.user_type.id())
        .bind(user.sector.as_ref().map(Sector::as_str))
        .bind(user.bio.as_deref())
        .bind(user.profession.as_deref())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query(
            r#"
            INSERT INTO user_infos (user_id, is_verified, verified_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(infos.user_id.as_uuid())
        .bind(infos.is_verified)
        .bind(infos.verified_at)
        .bind(infos.created_at)
        .bind(infos.updated_at)
        .execute(&mut *tx)
        .await?;

        if let Some(image) = profile_image {
            insert_profile_image(&mut *tx, image).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                name,
                email,
                password_hash,
                user_type,
                sector,
                bio,
                profession,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                name,
                email,
                password_hash,
                user_type,
                sector,
                bio,
                profession,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn update_profile(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                bio = $3,
                profession = $4,
                updated_at = $5
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.name.as_str())
        .bind(user.bio.as_deref())
        .bind(user.profession.as_deref())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// User Infos Repository Implementation
// ============================================================================

impl UserInfosRepository for PgAuthRepository {
    async fn find_infos(&self, user_id: &UserId) -> AuthResult<Option<UserInfos>> {
        let row = sqlx::query_as::<_, UserInfosRow>(
            r#"
            SELECT user_id, is_verified, verified_at, created_at, updated_at
            FROM user_infos
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserInfosRow::into_infos))
    }

    async fn mark_verified(&self, user_id: &UserId) -> AuthResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE user_infos SET
                is_verified = TRUE,
                verified_at = COALESCE(verified_at, NOW()),
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }
}

// ============================================================================
// Profile Image Repository Implementation
// ============================================================================

async fn insert_profile_image<'e, E>(executor: E, image: &ProfileImage) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO files (file_id, src, file_type, user_id, section_id, position, created_at, updated_at)
        VALUES ($1, $2, $3, $4, NULL, 0, $5, $5)
        "#,
    )
    .bind(image.file_id.as_uuid())
    .bind(&image.src)
    .bind(PROFILE_FILE_TYPE)
    .bind(image.user_id.as_uuid())
    .bind(image.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

impl ProfileImageRepository for PgAuthRepository {
    async fn create_profile_image(&self, image: &ProfileImage) -> AuthResult<()> {
        insert_profile_image(&self.pool, image).await?;
        Ok(())
    }

    async fn latest_profile_image(&self, user_id: &UserId) -> AuthResult<Option<ProfileImage>> {
        let row = sqlx::query_as::<_, ProfileImageRow>(
            r#"
            SELECT file_id, user_id, src, created_at
            FROM files
            WHERE user_id = $1 AND file_type = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(PROFILE_FILE_TYPE)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileImageRow::into_image))
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    user_type: i16,
    sector: Option<String>,
    bio: Option<String>,
    profession: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password = UserPassword::from_phc_string(self.password_hash)?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            name: UserName::from_db(self.name),
            email: Email::from_db(self.email),
            password,
            user_type: UserType::from_id(self.user_type),
            sector: self.sector.map(Sector::from_db),
            bio: self.bio,
            profession: self.profession,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserInfosRow {
    user_id: Uuid,
    is_verified: bool,
    verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserInfosRow {
    fn into_infos(self) -> UserInfos {
        UserInfos {
            user_id: UserId::from_uuid(self.user_id),
            is_verified: self.is_verified,
            verified_at: self.verified_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileImageRow {
    file_id: Uuid,
    user_id: Uuid,
    src: String,
    created_at: DateTime<Utc>,
}

impl ProfileImageRow {
    fn into_image(self) -> ProfileImage {
        ProfileImage {
            file_id: MediaFileId::from_uuid(self.file_id),
            user_id: UserId::from_uuid(self.user_id),
            src: self.src,
            created_at: self.created_at,
        }
    }
}

//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::user_profile::UserView;
use crate::domain::entity::user::User;
use crate::domain::value_object::UserId;

// ============================================================================
// Register
// ============================================================================

/// Register request
///
/// Missing fields deserialize as empty so validation can report them all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "type")]
    pub user_type: Option<String>,
    #[serde(rename = "secteur")]
    pub sector: Option<String>,
}

/// Register response, also sent by login on an unverified account
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// Verification token
    pub token: String,
}

// ============================================================================
// Login / Logout / Session
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserIdBody {
    pub id: UserId,
}

/// `{user: {id}}`
#[derive(Debug, Clone, Serialize)]
pub struct SignedInResponse {
    pub user: UserIdBody,
}

impl SignedInResponse {
    pub fn new(id: UserId) -> Self {
        Self {
            user: UserIdBody { id },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub logged_out: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionUserBody {
    pub id: UserId,
    #[serde(rename = "type")]
    pub user_type: &'static str,
}

/// `GET /api/auth/jwt`
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub user: SessionUserBody,
}

// ============================================================================
// Tokens
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OAuthRegisterRequest {
    pub password: String,
}

/// Code as number or numeric string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerifyCodeRequest {
    pub code: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecodedResponse {
    pub decoded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidResponse {
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OAuthCheckResponse {
    Existing { id: UserId },
    Available { valid: bool },
}

// ============================================================================
// OAuth callback
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OAuthCallbackQuery {
    pub code: String,
    pub state: String,
    /// Set by Google instead of `code` when consent is refused
    pub error: Option<String>,
}

// ============================================================================
// User profile
// ============================================================================

/// User as returned to its owner, never with the password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub user_type: &'static str,
    #[serde(rename = "secteur", skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    pub bio: Option<String>,
    pub profession: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    /// Latest profile image `src`, `null` when none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            user_type: user.user_type.code(),
            sector: user.sector.as_ref().map(|s| s.as_str().to_string()),
            bio: user.bio.clone(),
            profession: user.profession.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            is_verified: None,
            image: None,
        }
    }
}

impl From<UserView> for UserDto {
    fn from(view: UserView) -> Self {
        Self {
            is_verified: Some(view.is_verified),
            image: Some(view.image),
            ..Self::from(&view.user)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user: UserDto,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profession: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileImageResponse {
    pub image: String,
}

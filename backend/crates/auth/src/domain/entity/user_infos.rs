//! User Infos Entity
//!
//! Account state kept apart from the profile: currently the email
//! verification flag.

use chrono::{DateTime, Utc};

use crate::domain::value_object::UserId;

#[derive(Debug, Clone)]
pub struct UserInfos {
    pub user_id: UserId,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserInfos {
    /// Local sign-up: verified once the mailed code is entered
    pub fn unverified(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            is_verified: false,
            verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// OAuth sign-up: the provider already vouched for the email
    pub fn verified(user_id: UserId) -> Self {
        let mut infos = Self::unverified(user_id);
        infos.mark_verified();
        infos
    }

    pub fn mark_verified(&mut self) {
        let now = Utc::now();
        self.is_verified = true;
        self.verified_at.get_or_insert(now);
        self.updated_at = now;
    }
}

//! User Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    UserId, email::Email, sector::Sector, user_name::UserName, user_password::UserPassword,
    user_type::UserType,
};

/// User entity
///
/// The password hash lives here but is never serialized; responses are
/// built from DTOs.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: UserName,
    /// Unique, lowercase
    pub email: Email,
    pub password: UserPassword,
    pub user_type: UserType,
    /// Only set for organizations
    pub sector: Option<Sector>,
    pub bio: Option<String>,
    pub profession: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<UserName>,
    pub bio: Option<String>,
    pub profession: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.profession.is_none()
    }
}

impl User {
    pub fn new(
        name: UserName,
        email: Email,
        password: UserPassword,
        user_type: UserType,
        sector: Option<Sector>,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            name,
            email,
            password,
            user_type,
            sector: sector.filter(|_| user_type.is_organization()),
            bio: None,
            profession: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: ProfileChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(bio) = changes.bio {
            self.bio = Some(bio);
        }
        if let Some(profession) = changes.profession {
            self.profession = Some(profession);
        }
        self.updated_at = Utc::now();
    }
}

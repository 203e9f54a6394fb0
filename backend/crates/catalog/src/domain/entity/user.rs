//! User Entity
//!
//! A catalog account. Soft-deleted users keep their row (and their username)
//! until a new registration reclaims the name.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::Serialize;

use crate::domain::entity::playlist::Playlist;
use crate::domain::value_object::{email::Email, user_name::UserName, user_password::UserPassword};

/// User entity
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    /// Unique among all rows, soft-deleted included
    pub username: UserName,
    pub email: Email,
    /// Argon2id hash, never serialized
    #[serde(skip)]
    pub password: UserPassword,
    /// Soft-delete marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Loaded eagerly by list and username lookups, empty otherwise
    pub playlists: Vec<Playlist>,
}

impl User {
    /// Active users have no soft-delete marker
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// A user about to be inserted; the store assigns `id` and timestamps
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: UserName,
    pub email: Email,
    pub password: UserPassword,
}

/// Partial update of a user. `None` leaves the stored value untouched.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub id: UserId,
    pub username: Option<UserName>,
    /// Must already be hashed
    pub password: Option<UserPassword>,
}

impl UserUpdate {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            username: None,
            password: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }

    /// Merge the provided fields into `user`, bumping `updated_at`
    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(password) = &self.password {
            user.password = password.clone();
        }
        if !self.is_empty() {
            user.updated_at = Utc::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;
    use platform::password::HashingCost;

    fn user() -> User {
        let raw = RawPassword::new("secret".to_string()).unwrap();
        let now = Utc::now();
        User {
            id: UserId::new(1),
            username: UserName::new("alice").unwrap(),
            email: Email::new("a@x.com").unwrap(),
            password: UserPassword::from_raw(&raw, None, HashingCost::minimal()).unwrap(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
            playlists: Vec::new(),
        }
    }

    #[test]
    fn test_apply_username_only() {
        let mut user = user();
        let before = user.clone();

        let mut update = UserUpdate::new(user.id);
        update.username = Some(UserName::new("alicia").unwrap());
        update.apply_to(&mut user);

        assert_eq!(user.username.as_str(), "alicia");
        assert_eq!(user.password, before.password);
        assert_eq!(user.email, before.email);
    }

    #[test]
    fn test_apply_empty_update_is_noop() {
        let mut user = user();
        let before = user.clone();

        UserUpdate::new(user.id).apply_to(&mut user);

        assert_eq!(user.username, before.username);
        assert_eq!(user.password, before.password);
        assert_eq!(user.updated_at, before.updated_at);
    }

    #[test]
    fn test_serialize_hides_password() {
        let json = serde_json::to_value(user()).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["email"], "a@x.com");
        assert!(json.get("password").is_none());
        assert!(json.get("deleted_at").is_none());
    }
}

//! Playlist Entity
//!
//! Owned by one user; linked to songs through `playlist_songs`.

use chrono::{DateTime, Utc};
use kernel::id::{PlaylistId, UserId};
use serde::Serialize;

use crate::error::{CatalogError, CatalogResult};

/// Playlist entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A playlist about to be inserted
#[derive(Debug, Clone)]
pub struct NewPlaylist {
    pub name: String,
    pub user_id: UserId,
}

impl NewPlaylist {
    pub fn new(name: impl Into<String>, user_id: UserId) -> CatalogResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::Validation(
                "Playlist name cannot be empty".to_string(),
            ));
        }
        Ok(Self { name, user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_playlist() {
        let playlist = NewPlaylist::new(" Road Trip ", UserId::new(3)).unwrap();
        assert_eq!(playlist.name, "Road Trip");
        assert_eq!(playlist.user_id, UserId::new(3));
    }

    #[test]
    fn test_new_playlist_rejects_blank_name() {
        assert!(NewPlaylist::new("", UserId::new(3)).is_err());
    }
}

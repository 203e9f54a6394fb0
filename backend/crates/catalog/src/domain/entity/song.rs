//! Song Entity

use chrono::{DateTime, Utc};
use kernel::id::SongId;
use serde::Serialize;

use crate::error::{CatalogError, CatalogResult};

/// Song entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Song {
    pub id: SongId,
    pub name: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A song about to be inserted
#[derive(Debug, Clone)]
pub struct NewSong {
    pub name: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration_seconds: Option<i32>,
}

impl NewSong {
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> CatalogResult<Self> {
        let name = non_blank("Song name", name.into())?;
        Ok(Self {
            name,
            artist: artist.into().trim().to_string(),
            album: None,
            duration_seconds: None,
        })
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_duration(mut self, seconds: i32) -> CatalogResult<Self> {
        self.duration_seconds = Some(non_negative(seconds)?);
        Ok(self)
    }
}

/// Partial update of a song. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct SongUpdate {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_seconds: Option<i32>,
}

impl SongUpdate {
    /// Reject blank names and negative durations before they reach the store
    pub fn validate(&self) -> CatalogResult<()> {
        if let Some(name) = &self.name {
            non_blank("Song name", name.clone())?;
        }
        if let Some(seconds) = self.duration_seconds {
            non_negative(seconds)?;
        }
        Ok(())
    }
}

fn non_blank(field: &str, value: String) -> CatalogResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn non_negative(seconds: i32) -> CatalogResult<i32> {
    if seconds < 0 {
        return Err(CatalogError::Validation(format!(
            "Duration cannot be negative (got {seconds})"
        )));
    }
    Ok(seconds)
}

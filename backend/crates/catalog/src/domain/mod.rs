//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    playlist::{NewPlaylist, Playlist},
    song::{NewSong, Song, SongUpdate},
    user::{NewUser, User, UserUpdate},
};
pub use repository::{PlaylistRepository, SongRepository, UserRepository};

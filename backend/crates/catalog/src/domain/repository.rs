//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{PlaylistId, SongId, UserId};

use crate::domain::entity::{
    playlist::{NewPlaylist, Playlist},
    song::{NewSong, Song, SongUpdate},
    user::{NewUser, User, UserUpdate},
};
use crate::domain::value_object::user_name::UserName;
use crate::error::CatalogResult;

/// User repository trait
///
/// Lookups see active users only unless the method name says otherwise.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user, first purging a soft-deleted user holding the same username.
    /// Fails with `UsernameTaken` when an active user holds it.
    async fn create_user(&self, user: &NewUser) -> CatalogResult<User>;

    /// Apply the provided fields to an active user
    async fn update_user(&self, update: &UserUpdate) -> CatalogResult<User>;

    /// `UserNotFound` when no active user matches
    async fn find_user_by_id(&self, user_id: UserId) -> CatalogResult<User>;

    /// Lookup that also sees soft-deleted users
    async fn find_user_by_id_including_deleted(&self, user_id: UserId)
    -> CatalogResult<Option<User>>;

    /// Soft delete: set the deletion marker, keep the row
    async fn delete_user(&self, user_id: UserId) -> CatalogResult<()>;

    /// All active users with their playlists
    async fn get_all_users(&self) -> CatalogResult<Vec<User>>;

    /// One active user with playlists, `UserNotFound` when absent
    async fn find_by_username(&self, username: &UserName) -> CatalogResult<User>;
}

/// Song repository trait
#[trait_variant::make(SongRepository: Send)]
pub trait LocalSongRepository {
    async fn create_song(&self, song: &NewSong) -> CatalogResult<Song>;

    /// Partial update by ID, `SongNotFound` when no row matches
    async fn update_song(&self, song_id: SongId, update: &SongUpdate) -> CatalogResult<Song>;

    /// Hard delete, `SongNotFound` when no row matches
    async fn delete_song(&self, song_id: SongId) -> CatalogResult<()>;

    async fn get_all_songs(&self) -> CatalogResult<Vec<Song>>;

    async fn find_song_by_name(&self, name: &str) -> CatalogResult<Option<Song>>;

    async fn find_song_by_id(&self, song_id: SongId) -> CatalogResult<Option<Song>>;
}

/// Playlist repository trait
#[trait_variant::make(PlaylistRepository: Send)]
pub trait LocalPlaylistRepository {
    async fn create_playlist(&self, playlist: &NewPlaylist) -> CatalogResult<Playlist>;

    /// Link a song to a playlist. Linking an existing pair again is a no-op.
    async fn add_song_to_playlist(
        &self,
        playlist_id: PlaylistId,
        song_id: SongId,
    ) -> CatalogResult<()>;

    async fn get_playlist_by_name_and_user_id(
        &self,
        name: &str,
        user_id: UserId,
    ) -> CatalogResult<Option<Playlist>>;

    async fn get_all_playlists(&self) -> CatalogResult<Vec<Playlist>>;

    /// Songs linked to a playlist, in the order they were added
    async fn get_playlist_songs(&self, playlist_id: PlaylistId) -> CatalogResult<Vec<Song>>;
}

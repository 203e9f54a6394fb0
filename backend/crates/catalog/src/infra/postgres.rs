//! PostgreSQL Repository Implementations

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::error::conversions::{PG_FOREIGN_KEY_VIOLATION, PG_UNIQUE_VIOLATION};
use kernel::id::{PlaylistId, SongId, UserId};
use sqlx::PgPool;

use crate::domain::entity::{
    playlist::{NewPlaylist, Playlist},
    song::{NewSong, Song, SongUpdate},
    user::{NewUser, User, UserUpdate},
};
use crate::domain::repository::{PlaylistRepository, SongRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword,
};
use crate::error::{CatalogError, CatalogResult};

/// PostgreSQL-backed catalog repository
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Playlists of the given users, grouped by owner
    async fn playlists_by_owner(
        &self,
        user_ids: &[i64],
    ) -> CatalogResult<HashMap<i64, Vec<Playlist>>> {
        let rows = sqlx::query_as::<_, PlaylistRow>(
            r#"
            SELECT
                id,
                name,
                user_id,
                created_at,
                updated_at
            FROM playlists
            WHERE user_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Playlist>> = HashMap::new();
        for row in rows {
            grouped.entry(row.user_id).or_default().push(row.into_playlist());
        }
        Ok(grouped)
    }
}

/// Map a unique violation on `users.username` to `UsernameTaken`
fn username_conflict(err: sqlx::Error) -> CatalogError {
    match constraint_violation(&err) {
        Some((PG_UNIQUE_VIOLATION, Some(name))) if name == "users_username_key" => {
            CatalogError::UsernameTaken
        }
        _ => CatalogError::Database(err),
    }
}

/// SQLSTATE and constraint name of an integrity violation
fn constraint_violation(err: &sqlx::Error) -> Option<(&'static str, Option<String>)> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    let code = match db_err.code().as_deref() {
        Some(PG_UNIQUE_VIOLATION) => PG_UNIQUE_VIOLATION,
        Some(PG_FOREIGN_KEY_VIOLATION) => PG_FOREIGN_KEY_VIOLATION,
        _ => return None,
    };
    Some((code, db_err.constraint().map(str::to_string)))
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgCatalogRepository {
    async fn create_user(&self, user: &NewUser) -> CatalogResult<User> {
        // Reclaim and insert in one transaction so two registrations cannot
        // both observe the soft-deleted row.
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, (i64, Option<DateTime<Utc>>)>(
            "SELECT id, deleted_at FROM users WHERE username = $1 FOR UPDATE",
        )
        .bind(user.username.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        match existing {
            Some((_, None)) => return Err(CatalogError::UsernameTaken),
            Some((stale_id, Some(deleted_at))) => {
                sqlx::query("DELETE FROM users WHERE id = $1")
                    .bind(stale_id)
                    .execute(&mut *tx)
                    .await?;

                tracing::info!(
                    user_id = stale_id,
                    username = %user.username,
                    deleted_at = %deleted_at,
                    "Purged soft-deleted user to reclaim username"
                );
            }
            None => {}
        }

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (
                username,
                email,
                password
            ) VALUES ($1, $2, $3)
            RETURNING
                id,
                username,
                email,
                password,
                deleted_at,
                created_at,
                updated_at
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_phc_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(username_conflict)?;

        tx.commit().await?;

        row.into_user(Vec::new())
    }

    async fn update_user(&self, update: &UserUpdate) -> CatalogResult<User> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id,
                username,
                email,
                password,
                deleted_at,
                created_at,
                updated_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(update.id.value())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CatalogError::UserNotFound)?;

        let mut user = row.into_user(Vec::new())?;
        if update.is_empty() {
            return Ok(user);
        }
        update.apply_to(&mut user);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users SET
                username = $2,
                password = $3,
                updated_at = now()
            WHERE id = $1
            RETURNING
                id,
                username,
                email,
                password,
                deleted_at,
                created_at,
                updated_at
            "#,
        )
        .bind(user.id.value())
        .bind(user.username.as_str())
        .bind(user.password.as_phc_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(username_conflict)?;

        tx.commit().await?;

        row.into_user(Vec::new())
    }

    async fn find_user_by_id(&self, user_id: UserId) -> CatalogResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id,
                username,
                email,
                password,
                deleted_at,
                created_at,
                updated_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CatalogError::UserNotFound)?;

        row.into_user(Vec::new())
    }

    async fn find_user_by_id_including_deleted(
        &self,
        user_id: UserId,
    ) -> CatalogResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id,
                username,
                email,
                password,
                deleted_at,
                created_at,
                updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user(Vec::new())).transpose()
    }

    async fn delete_user(&self, user_id: UserId) -> CatalogResult<()> {
        let affected = sqlx::query(
            r#"
            UPDATE users SET
                deleted_at = now(),
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id.value())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(CatalogError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, "Soft-deleted user");

        Ok(())
    }

    async fn get_all_users(&self) -> CatalogResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id,
                username,
                email,
                password,
                deleted_at,
                created_at,
                updated_at
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut playlists = self.playlists_by_owner(&ids).await?;

        rows.into_iter()
            .map(|r| {
                let owned = playlists.remove(&r.id).unwrap_or_default();
                r.into_user(owned)
            })
            .collect()
    }

    async fn find_by_username(&self, username: &UserName) -> CatalogResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id,
                username,
                email,
                password,
                deleted_at,
                created_at,
                updated_at
            FROM users
            WHERE username = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CatalogError::UserNotFound)?;

        let owned = self
            .playlists_by_owner(&[row.id])
            .await?
            .remove(&row.id)
            .unwrap_or_default();

        row.into_user(owned)
    }
}

// ============================================================================
// Song Repository Implementation
// ============================================================================

impl SongRepository for PgCatalogRepository {
    async fn create_song(&self, song: &NewSong) -> CatalogResult<Song> {
        let row = sqlx::query_as::<_, SongRow>(
            r#"
            INSERT INTO songs (
                name,
                artist,
                album,
                duration_seconds
            ) VALUES ($1, $2, $3, $4)
            RETURNING
                id,
                name,
                artist,
                album,
                duration_seconds,
                created_at,
                updated_at
            "#,
        )
        .bind(&song.name)
        .bind(&song.artist)
        .bind(song.album.as_deref())
        .bind(song.duration_seconds)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_song())
    }

    async fn update_song(&self, song_id: SongId, update: &SongUpdate) -> CatalogResult<Song> {
        update.validate()?;

        let row = sqlx::query_as::<_, SongRow>(
            r#"
            UPDATE songs SET
                name = COALESCE($2, name),
                artist = COALESCE($3, artist),
                album = COALESCE($4, album),
                duration_seconds = COALESCE($5, duration_seconds),
                updated_at = now()
            WHERE id = $1
            RETURNING
                id,
                name,
                artist,
                album,
                duration_seconds,
                created_at,
                updated_at
            "#,
        )
        .bind(song_id.value())
        .bind(update.name.as_deref().map(str::trim))
        .bind(update.artist.as_deref().map(str::trim))
        .bind(update.album.as_deref())
        .bind(update.duration_seconds)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CatalogError::SongNotFound)?;

        Ok(row.into_song())
    }

    async fn delete_song(&self, song_id: SongId) -> CatalogResult<()> {
        let affected = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(song_id.value())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(CatalogError::SongNotFound);
        }

        tracing::info!(song_id = %song_id, "Deleted song");

        Ok(())
    }

    async fn get_all_songs(&self) -> CatalogResult<Vec<Song>> {
        let rows = sqlx::query_as::<_, SongRow>(
            r#"
            SELECT
                id,
                name,
                artist,
                album,
                duration_seconds,
                created_at,
                updated_at
            FROM songs
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SongRow::into_song).collect())
    }

    async fn find_song_by_name(&self, name: &str) -> CatalogResult<Option<Song>> {
        let row = sqlx::query_as::<_, SongRow>(
            r#"
            SELECT
                id,
                name,
                artist,
                album,
                duration_seconds,
                created_at,
                updated_at
            FROM songs
            WHERE name = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SongRow::into_song))
    }

    async fn find_song_by_id(&self, song_id: SongId) -> CatalogResult<Option<Song>> {
        let row = sqlx::query_as::<_, SongRow>(
            r#"
            SELECT
                id,
                name,
                artist,
                album,
                duration_seconds,
                created_at,
                updated_at
            FROM songs
            WHERE id = $1
            "#,
        )
        .bind(song_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SongRow::into_song))
    }
}

// ============================================================================
// Playlist Repository Implementation
// ============================================================================

impl PlaylistRepository for PgCatalogRepository {
    async fn create_playlist(&self, playlist: &NewPlaylist) -> CatalogResult<Playlist> {
        let row = sqlx::query_as::<_, PlaylistRow>(
            r#"
            INSERT INTO playlists (
                name,
                user_id
            ) VALUES ($1, $2)
            RETURNING
                id,
                name,
                user_id,
                created_at,
                updated_at
            "#,
        )
        .bind(&playlist.name)
        .bind(playlist.user_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match constraint_violation(&e) {
            Some((PG_FOREIGN_KEY_VIOLATION, _)) => CatalogError::UserNotFound,
            _ => CatalogError::Database(e),
        })?;

        Ok(row.into_playlist())
    }

    async fn add_song_to_playlist(
        &self,
        playlist_id: PlaylistId,
        song_id: SongId,
    ) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO playlist_songs (playlist_id, song_id)
            VALUES ($1, $2)
            ON CONFLICT (playlist_id, song_id) DO NOTHING
            "#,
        )
        .bind(playlist_id.value())
        .bind(song_id.value())
        .execute(&self.pool)
        .await
        .map_err(|e| match constraint_violation(&e) {
            Some((PG_FOREIGN_KEY_VIOLATION, Some(name))) => match name.as_str() {
                "playlist_songs_playlist_id_fkey" => CatalogError::PlaylistNotFound,
                "playlist_songs_song_id_fkey" => CatalogError::SongNotFound,
                _ => CatalogError::Database(e),
            },
            _ => CatalogError::Database(e),
        })?;

        Ok(())
    }

    async fn get_playlist_by_name_and_user_id(
        &self,
        name: &str,
        user_id: UserId,
    ) -> CatalogResult<Option<Playlist>> {
        let row = sqlx::query_as::<_, PlaylistRow>(
            r#"
            SELECT
                id,
                name,
                user_id,
                created_at,
                updated_at
            FROM playlists
            WHERE name = $1 AND user_id = $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PlaylistRow::into_playlist))
    }

    async fn get_all_playlists(&self) -> CatalogResult<Vec<Playlist>> {
        let rows = sqlx::query_as::<_, PlaylistRow>(
            r#"
            SELECT
                id,
                name,
                user_id,
                created_at,
                updated_at
            FROM playlists
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PlaylistRow::into_playlist).collect())
    }

    async fn get_playlist_songs(&self, playlist_id: PlaylistId) -> CatalogResult<Vec<Song>> {
        let rows = sqlx::query_as::<_, SongRow>(
            r#"
            SELECT
                s.id,
                s.name,
                s.artist,
                s.album,
                s.duration_seconds,
                s.created_at,
                s.updated_at
            FROM playlist_songs ps
            JOIN songs s ON s.id = ps.song_id
            WHERE ps.playlist_id = $1
            ORDER BY ps.added_at, s.id
            "#,
        )
        .bind(playlist_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SongRow::into_song).collect())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password: String,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, playlists: Vec<Playlist>) -> CatalogResult<User> {
        Ok(User {
            id: UserId::new(self.id),
            username: UserName::from_db(self.username),
            email: Email::from_db(self.email),
            password: UserPassword::from_db(self.password)?,
            deleted_at: self.deleted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
            playlists,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SongRow {
    id: i64,
    name: String,
    artist: String,
    album: Option<String>,
    duration_seconds: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SongRow {
    fn into_song(self) -> Song {
        Song {
            id: SongId::new(self.id),
            name: self.name,
            artist: self.artist,
            album: self.album,
            duration_seconds: self.duration_seconds,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PlaylistRow {
    id: i64,
    name: String,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlaylistRow {
    fn into_playlist(self) -> Playlist {
        Playlist {
            id: PlaylistId::new(self.id),
            name: self.name,
            user_id: UserId::new(self.user_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

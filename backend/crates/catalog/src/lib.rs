//! Music Catalog Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - User service (registration, credential validation) and config
//! - `infra/` - PostgreSQL data access
//!
//! ## Features
//! - Users, songs and playlists persisted in PostgreSQL
//! - Soft-deleted users; a later registration reclaims their username
//! - Playlist to song links through the `playlist_songs` association table
//!
//! ## Security Model
//! - Passwords hashed with salted Argon2id, cost configurable
//! - Clear text passwords zeroized on drop and never persisted or serialized

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::CatalogConfig;
pub use application::user_service::UserService;
pub use error::{CatalogError, CatalogResult};
pub use infra::postgres::PgCatalogRepository;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
pub use kernel::id::{PlaylistId, SongId, UserId};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}

//! Catalog Error Types
//!
//! Catalog-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Callers pick the transport status from
//! [`CatalogError::kind`].

use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use thiserror::Error;

/// Catalog-specific result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-specific error variants
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No active user matches
    #[error("User not found")]
    UserNotFound,

    #[error("Song not found")]
    SongNotFound,

    #[error("Playlist not found")]
    PlaylistNotFound,

    /// An active user already holds the username
    #[error("Username already taken")]
    UsernameTaken,

    /// Registration hit an existing user with the same username and email
    #[error("Username or email already taken")]
    UsernameOrEmailTaken,

    /// Unknown user or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Input rejected by a value object
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::UserNotFound
            | CatalogError::SongNotFound
            | CatalogError::PlaylistNotFound => ErrorKind::NotFound,
            CatalogError::UsernameTaken | CatalogError::UsernameOrEmailTaken => {
                ErrorKind::Conflict
            }
            CatalogError::InvalidCredentials => ErrorKind::Unauthorized,
            CatalogError::Validation(_) => ErrorKind::BadRequest,
            CatalogError::Database(e) => classify_sqlx(e).0,
            CatalogError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            CatalogError::Internal(msg) => {
                tracing::error!(message = %msg, "Catalog internal error");
            }
            CatalogError::InvalidCredentials => {
                tracing::warn!("Invalid credentials");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl From<platform::password::PasswordHashError> for CatalogError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        CatalogError::Internal(err.to_string())
    }
}

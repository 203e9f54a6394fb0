//! Application Layer
//!
//! User-facing services and their configuration.

pub mod config;
pub mod user_service;

// Re-exports
pub use config::CatalogConfig;
pub use user_service::{RegisterUserInput, UpdateUserInput, UserService};

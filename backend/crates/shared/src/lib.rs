//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by every backend crate:
//! - Error classification ([`error::kind::ErrorKind`]) and the unified [`error::app_error::AppError`]
//! - Typed integer identifiers ([`id::Id`])
//!
//! Database specific conversions are behind the `sqlx` feature.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;

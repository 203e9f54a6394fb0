//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations that carry no catalog vocabulary:
//! - Password hashing (salted Argon2id with a configurable cost)
//! - Zeroized handling of clear text secrets

pub mod password;

//! Entity Module

pub mod playlist;
pub mod song;
pub mod user;

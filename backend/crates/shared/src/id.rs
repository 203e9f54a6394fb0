//! Typed Row IDs
//!
//! Store-assigned `BIGSERIAL` keys wrapped in a marker type so a song ID can
//! never be passed where a user ID is expected.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type UserId = Id<markers::User>;
/// let id = UserId::new(7);
/// assert_eq!(id.value(), 7);
/// ```
pub struct Id<T> {
    value: i64,
    _marker: PhantomData<fn() -> T>,
}

/// Error returned when an ID cannot be parsed from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIdError {
    #[error("ID is not a valid integer: {0}")]
    NotAnInteger(String),

    #[error("ID must be positive (got {0})")]
    NotPositive(i64),
}

impl<T> Id<T> {
    /// Wrap a raw key
    pub const fn new(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Get the raw key for binding into queries
    pub const fn value(&self) -> i64 {
        self.value
    }
}

// Manual impls: derives would put bounds on the marker type.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> FromStr for Id<T> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| ParseIdError::NotAnInteger(s.to_string()))?;
        if value <= 0 {
            return Err(ParseIdError::NotPositive(value));
        }
        Ok(Self::new(value))
    }
}

impl<T> From<i64> for Id<T> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl<T> From<Id<T>> for i64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::new)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for User IDs
    pub struct User;

    /// Marker for Song IDs
    pub struct Song;

    /// Marker for Playlist IDs
    pub struct Playlist;
}

/// Type aliases for common IDs
pub type UserId = Id<markers::User>;
pub type SongId = Id<markers::Song>;
pub type PlaylistId = Id<markers::Playlist>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_value() {
        let id = UserId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_id_from_str() {
        let id: SongId = "17".parse().unwrap();
        assert_eq!(id, SongId::new(17));

        let id: SongId = " 3 ".parse().unwrap();
        assert_eq!(id.value(), 3);
    }

    #[test]
    fn test_id_from_str_rejects_garbage() {
        assert!(matches!(
            "abc".parse::<PlaylistId>(),
            Err(ParseIdError::NotAnInteger(_))
        ));
        assert_eq!("0".parse::<PlaylistId>(), Err(ParseIdError::NotPositive(0)));
        assert_eq!("-5".parse::<PlaylistId>(), Err(ParseIdError::NotPositive(-5)));
    }

    #[test]
    fn test_id_serde_is_plain_integer() {
        let json = serde_json::to_string(&UserId::new(9)).unwrap();
        assert_eq!(json, "9");

        let id: UserId = serde_json::from_str("11").unwrap();
        assert_eq!(id.value(), 11);
    }

    #[test]
    fn test_id_ordering() {
        let mut ids = vec![SongId::new(3), SongId::new(1), SongId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![SongId::new(1), SongId::new(2), SongId::new(3)]);
    }
}

//! User Password Value Object
//!
//! Domain wrappers around `platform::password`.
//!
//! ## Usage
//! ```rust
//! use catalog::models::user_password::{RawPassword, UserPassword};
//! use platform::password::HashingCost;
//!
//! let raw = RawPassword::new("secret".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, None, HashingCost::minimal()).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use platform::password::{ClearTextPassword, HashedPassword, HashingCost};
use std::fmt;

use crate::error::{CatalogError, CatalogResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input, zeroized when dropped
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    pub fn new(raw: String) -> CatalogResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|e| CatalogError::Validation(e.to_string()))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password, the only form ever written to `users.password`
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password with a fresh salt
    pub fn from_raw(
        raw: &RawPassword,
        pepper: Option<&[u8]>,
        cost: HashingCost,
    ) -> CatalogResult<Self> {
        Ok(Self(raw.0.hash(pepper, cost)?))
    }

    /// Create from PHC string (from database)
    pub fn from_db(phc_string: impl Into<String>) -> CatalogResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|_| CatalogError::Internal("Invalid password hash in database".to_string()))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Verify a raw password against this hash
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(&raw.0, pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

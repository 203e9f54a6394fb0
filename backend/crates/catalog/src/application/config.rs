//! Application Configuration
//!
//! Password hashing settings for the catalog application layer.

use platform::password::HashingCost;

use crate::error::{CatalogError, CatalogResult};

/// Environment variable holding the optional password pepper
pub const ENV_PASSWORD_PEPPER: &str = "PASSWORD_PEPPER";
/// Argon2 memory cost in KiB
pub const ENV_HASH_MEMORY_KIB: &str = "PASSWORD_HASH_MEMORY_KIB";
/// Argon2 passes
pub const ENV_HASH_ITERATIONS: &str = "PASSWORD_HASH_ITERATIONS";
/// Argon2 lanes
pub const ENV_HASH_PARALLELISM: &str = "PASSWORD_HASH_PARALLELISM";

/// Catalog application configuration
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Argon2id work factor for new hashes
    pub hashing_cost: HashingCost,
}

impl CatalogConfig {
    /// Create config for development (cheap hashing, no pepper)
    pub fn development() -> Self {
        Self {
            password_pepper: None,
            hashing_cost: HashingCost::minimal(),
        }
    }

    /// Build from a key lookup, falling back to defaults for missing keys
    ///
    /// ```rust
    /// use catalog::CatalogConfig;
    ///
    /// let config = CatalogConfig::from_lookup(|key| match key {
    ///     "PASSWORD_HASH_ITERATIONS" => Some("3".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.hashing_cost.iterations, 3);
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CatalogResult<Self> {
        let defaults = HashingCost::default();

        let parse = |key: &str, default: u32| -> CatalogResult<u32> {
            match lookup(key) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    CatalogError::Validation(format!("{key} must be an unsigned integer"))
                }),
                None => Ok(default),
            }
        };

        let hashing_cost = HashingCost {
            memory_kib: parse(ENV_HASH_MEMORY_KIB, defaults.memory_kib)?,
            iterations: parse(ENV_HASH_ITERATIONS, defaults.iterations)?,
            parallelism: parse(ENV_HASH_PARALLELISM, defaults.parallelism)?,
        };
        hashing_cost
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let password_pepper = lookup(ENV_PASSWORD_PEPPER)
            .filter(|p| !p.is_empty())
            .map(String::into_bytes);

        Ok(Self {
            password_pepper,
            hashing_cost,
        })
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CatalogConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.hashing_cost, HashingCost::default());
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_reads_cost_and_pepper() {
        let config = CatalogConfig::from_lookup(lookup_from(&[
            (ENV_PASSWORD_PEPPER, "pepper"),
            (ENV_HASH_MEMORY_KIB, "8192"),
            (ENV_HASH_ITERATIONS, "4"),
            (ENV_HASH_PARALLELISM, "2"),
        ]))
        .unwrap();

        assert_eq!(config.pepper(), Some(&b"pepper"[..]));
        assert_eq!(
            config.hashing_cost,
            HashingCost {
                memory_kib: 8192,
                iterations: 4,
                parallelism: 2,
            }
        );
    }

    #[test]
    fn test_empty_pepper_is_none() {
        let config =
            CatalogConfig::from_lookup(lookup_from(&[(ENV_PASSWORD_PEPPER, "")])).unwrap();
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_rejects_out_of_range_cost() {
        for (key, value) in [
            (ENV_HASH_ITERATIONS, "0"),
            (ENV_HASH_PARALLELISM, "0"),
            (ENV_HASH_MEMORY_KIB, "1"),
        ] {
            let result = CatalogConfig::from_lookup(lookup_from(&[(key, value)]));
            assert!(
                matches!(result, Err(CatalogError::Validation(_))),
                "{key}={value} accepted"
            );
        }
    }

    #[test]
    fn test_rejects_bad_number() {
        let result = CatalogConfig::from_lookup(lookup_from(&[(ENV_HASH_ITERATIONS, "lots")]));
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }
}

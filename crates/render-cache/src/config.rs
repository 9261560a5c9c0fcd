//! Cache configuration

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Budgets for a single backing store.
///
/// Each [`NamedCache`](crate::NamedCache) captures one of these at
/// construction and applies it to the store it lazily allocates on first
/// write. Budgets are the point at which "memory pressure" begins: below
/// them, entries are retained indefinitely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries per backing store
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Maximum tracked bytes per backing store (0 = untracked)
    ///
    /// Only insertions that declare a size via `put_with_size` count
    /// against this budget.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

// Default value functions
fn default_max_entries() -> usize {
    1024
}
fn default_max_bytes() -> usize {
    64 * 1024 * 1024
} // 64MB

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_bytes: default_max_bytes(),
        }
    }
}

impl CacheConfig {
    /// Create a minimal config for resource-constrained environments
    pub fn minimal() -> Self {
        Self {
            max_entries: 256,
            max_bytes: 16 * 1024 * 1024, // 16MB
        }
    }

    /// Create an aggressive caching config for performance
    pub fn performance() -> Self {
        Self {
            max_entries: 4096,
            max_bytes: 256 * 1024 * 1024, // 256MB
        }
    }

    /// Parse a config from a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the budgets describe a usable store
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(Error::Config(
                "max_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

//! Error types for render-cache
//!
//! Cache operations are total: a missing key or an empty cache is an
//! ordinary `None`/`false`/`0` outcome, never an error. The only fallible
//! surface is configuration.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// render-cache error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

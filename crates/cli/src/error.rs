//! CLI error types.

use crate::config::ConfigError;
use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No policy file was given on the command line or in configuration.
    #[error("no policy given: pass --policy or set `policy` in capgate.toml")]
    MissingPolicy,

    /// Configuration is invalid or unreadable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred loading documents or running vectors.
    #[error(transparent)]
    Conformance(#[from] conformance::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

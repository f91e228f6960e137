//! Conformance error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating or running documents.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported document format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("{path} does not conform to the {kind} schema: {reason}")]
    Invalid {
        path: PathBuf,
        kind: &'static str,
        reason: String,
    },

    #[error("schema {name} is unusable: {reason}")]
    Schema { name: String, reason: String },

    #[error("could not find test-vectors/capability-eval above {from}")]
    RootNotFound { from: PathBuf },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

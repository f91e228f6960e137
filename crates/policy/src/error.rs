//! Policy error types.

use thiserror::Error;

/// Policy errors.
///
/// Capability decisions never produce an error: every failure on the decision
/// path folds into a denial. This type only covers turning raw strings into
/// the typed request model.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The capability kind is not one of the fixed kinds.
    #[error("unknown capability kind: {0}")]
    UnknownKind(String),
}

pub type Result<T> = std::result::Result<T, Error>;

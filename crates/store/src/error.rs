//! Store-level error model.

use thiserror::Error;

/// Result type used across the store layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure surfaced by a store operation.
///
/// Every store call is attempted once per logical step; there is no retry
/// machinery behind any of these.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (startup ping, selection timeout).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Driver-level failure from an individual operation.
    #[error("store backend error: {0}")]
    Backend(#[from] mongodb::error::Error),

    /// A document could not be mapped to or from its domain shape.
    #[error("document codec error: {0}")]
    Codec(String),
}

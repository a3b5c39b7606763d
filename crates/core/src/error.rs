//! Domain error model.
//!
//! Keep this focused on deterministic domain failures. Infrastructure
//! concerns belong to the store layer.

use thiserror::Error;

/// A textual identifier could not be parsed into its ObjectId form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind} ID: {value}")]
pub struct InvalidIdError {
    /// Which kind of identifier failed to parse ("product", "order").
    pub kind: &'static str,
    /// The offending input, verbatim.
    pub value: String,
}

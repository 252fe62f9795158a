//! Error types for context resolution and form location

use thiserror::Error;

/// Errors returned at the API boundary.
///
/// Classification itself is total; only selections that violate
/// `start <= end <= len` are rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Selection does not fit the document
    ///
    /// **Triggered by:** `start > end` or `end` past the document length
    /// **Example:** `locate_form("(a)", 2, 1)`
    #[error("Invalid selection {start}..{end} for document of length {len}")]
    InvalidSelection {
        /// Selection start offset
        start: usize,
        /// Selection end offset
        end: usize,
        /// Document length in bytes
        len: usize,
    },
}

/// Result type for fallible operations
pub type Result<T> = std::result::Result<T, Error>;

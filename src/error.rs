//! Error types shared by every structure in this crate.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by tree operations.
///
/// Presence queries (`get`, `successor`, ...) never produce an error, they return `None`.
/// Extremal queries (`min`, `max`) on an empty container do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An argument the operation cannot accept, e.g. a B-tree degree below 2.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An extremal query was made on an empty container.
    #[error("not found: {0}")]
    NotFound(&'static str),

    /// A bitstring handed to a code tree does not decode cleanly.
    #[error("invalid encoding at bit {position}: {reason}")]
    InvalidEncoding {
        /// Index of the offending bit, or where the unfinished code starts.
        position: usize,
        /// What went wrong.
        reason: &'static str,
    },
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

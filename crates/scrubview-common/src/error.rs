//! Common error types used throughout scrubview.
//!
//! Covers the failures that can happen before any network traffic: malformed
//! identifiers and timestamps supplied by the caller.

/// Common error type for scrubview.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An identifier could not be parsed.
    #[error("Invalid {kind} id: {value}")]
    InvalidId {
        /// Which kind of id was being parsed ("item", "user", ...).
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A playback position could not be parsed.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl Error {
    /// Create a new InvalidId error.
    pub fn invalid_id<S: Into<String>>(kind: &'static str, value: S) -> Self {
        Self::InvalidId {
            kind,
            value: value.into(),
        }
    }

    /// Create a new InvalidTimestamp error.
    pub fn invalid_timestamp<S: Into<String>>(msg: S) -> Self {
        Self::InvalidTimestamp(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

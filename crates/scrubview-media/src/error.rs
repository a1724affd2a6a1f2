//! Error types for scrubview-media.

use thiserror::Error;

/// Result type for scrubview-media operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for scrubview-media operations.
///
/// Errors are `Clone` so a failed descriptor resolution can be memoized and
/// handed to every caller that raced on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The item carries no trickplay data.
    #[error("Trickplay metadata unavailable: {0}")]
    MetadataUnavailable(String),

    /// Trickplay data is present but cannot be interpreted.
    #[error("Malformed trickplay descriptor: {0}")]
    MalformedDescriptor(String),

    /// A tile sheet payload could not be decoded as an image.
    #[error("Failed to decode tile sheet: {0}")]
    Decode(String),

    /// The tile rectangle does not fit inside the sheet.
    #[error("Cannot extract tile ({tile_x}, {tile_y}): {reason}")]
    ExtractionFailed {
        tile_x: u32,
        tile_y: u32,
        reason: String,
    },
}

impl Error {
    /// Create a metadata-unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::MetadataUnavailable(msg.into())
    }

    /// Create a malformed-descriptor error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDescriptor(msg.into())
    }
}

//! Failure modes of a preview request.
//!
//! None of these reach the UI: [`PreviewLoader::load_preview`](super::PreviewLoader::load_preview)
//! logs them and returns `None`. They stay typed so diagnostics (and the CLI)
//! can say why a preview is missing.

use scrubview_media::Error as MediaError;
use thiserror::Error;

/// Why a preview could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    /// The item document could not be retrieved.
    #[error("Failed to fetch item metadata: {0}")]
    MetadataFetchFailed(String),

    /// The item has no trickplay data.
    #[error("No trickplay metadata: {0}")]
    MetadataUnavailable(String),

    /// Trickplay data is present but unusable.
    #[error("Malformed trickplay descriptor: {0}")]
    MalformedDescriptor(String),

    /// The position lies past the last advertised thumbnail.
    #[error("Thumbnail {thumbnail_index} is past the last of {thumbnail_count}")]
    OutOfRange {
        thumbnail_index: u64,
        thumbnail_count: u32,
    },

    /// A tile sheet could not be fetched or decoded.
    #[error("Failed to fetch tile sheet {sheet_index}: {reason}")]
    SheetFetchFailed { sheet_index: u64, reason: String },

    /// The tile could not be cut out of its sheet.
    #[error("Failed to extract thumbnail: {0}")]
    ExtractionFailed(String),
}

impl PreviewError {
    /// Whether this is the ordinary "item has no previews" case rather than a fault.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::MetadataUnavailable(_) | Self::OutOfRange { .. })
    }

    pub(crate) fn sheet(sheet_index: u64, reason: impl ToString) -> Self {
        Self::SheetFetchFailed {
            sheet_index,
            reason: reason.to_string(),
        }
    }
}

impl From<MediaError> for PreviewError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::MetadataUnavailable(msg) => Self::MetadataUnavailable(msg),
            MediaError::MalformedDescriptor(msg) => Self::MalformedDescriptor(msg),
            err @ MediaError::ExtractionFailed { .. } => Self::ExtractionFailed(err.to_string()),
            // Decode failures only happen for sheets; callers that know the
            // sheet index map them with PreviewError::sheet instead.
            MediaError::Decode(msg) => Self::ExtractionFailed(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_media_errors() {
        assert_eq!(
            PreviewError::from(MediaError::unavailable("none")),
            PreviewError::MetadataUnavailable("none".into())
        );
        assert_eq!(
            PreviewError::from(MediaError::malformed("bad")),
            PreviewError::MalformedDescriptor("bad".into())
        );
        let err = PreviewError::from(MediaError::ExtractionFailed {
            tile_x: 1,
            tile_y: 2,
            reason: "too small".into(),
        });
        assert!(matches!(err, PreviewError::ExtractionFailed(msg) if msg.contains("(1, 2)")));
    }

    #[test]
    fn expected_failures() {
        assert!(PreviewError::MetadataUnavailable(String::new()).is_expected());
        assert!(PreviewError::OutOfRange {
            thumbnail_index: 9,
            thumbnail_count: 3
        }
        .is_expected());
        assert!(!PreviewError::sheet(0, "404").is_expected());
    }
}

//! Media server transport.
//!
//! [`MediaServer`] is the narrow surface the preview subsystem needs: the item
//! detail document and the raw bytes of one tile sheet. [`JellyfinClient`] is
//! the HTTP implementation.

mod jellyfin;

pub use jellyfin::JellyfinClient;

use anyhow::Result;
use bytes::Bytes;
use scrubview_common::{ItemId, MediaSourceId};

/// Trickplay endpoints of a media server.
#[async_trait::async_trait]
pub trait MediaServer: Send + Sync {
    /// Raw JSON body of the item detail document.
    async fn item_document(&self, item_id: ItemId) -> Result<Bytes>;

    /// Raw image bytes of one tile sheet.
    async fn trickplay_sheet(
        &self,
        item_id: ItemId,
        sheet_width: u32,
        sheet_index: u64,
        media_source_id: &MediaSourceId,
    ) -> Result<Bytes>;
}

//! Tile sheet retrieval and decoding.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::DynamicImage;
use scrubview_common::ItemId;
use scrubview_media::{decode_sheet, TrickplayDescriptor};
use tracing::debug;

use super::cache::SheetCache;
use super::PreviewError;
use crate::client::MediaServer;

/// Fetches and decodes tile sheets.
///
/// Without a sheet cache every call downloads and decodes the sheet again,
/// even when a neighbouring tile of the same sheet was just served.
///
/// Every [`clear`](Self::clear) starts a new generation. A fetch that began in
/// an older generation still returns its sheet but never caches it.
pub struct TileSheetFetcher {
    server: Arc<dyn MediaServer>,
    sheets: Option<SheetCache>,
    generation: AtomicU64,
}

impl TileSheetFetcher {
    /// `sheet_cache_capacity` of 0 disables sheet caching.
    pub fn new(server: Arc<dyn MediaServer>, sheet_cache_capacity: usize) -> Self {
        let sheets = (sheet_cache_capacity > 0).then(|| SheetCache::new(sheet_cache_capacity, 1));
        Self {
            server,
            sheets,
            generation: AtomicU64::new(0),
        }
    }

    /// Current generation, bumped by every [`clear`](Self::clear).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Fetch and decode a sheet on behalf of a request started in `generation`.
    pub async fn fetch_sheet(
        &self,
        item_id: ItemId,
        sheet_index: u64,
        descriptor: &TrickplayDescriptor,
        generation: u64,
    ) -> Result<Arc<DynamicImage>, PreviewError> {
        if let Some(sheet) = self.sheets.as_ref().and_then(|c| c.get(&sheet_index)) {
            debug!(sheet_index, "Tile sheet cache hit");
            return Ok(sheet);
        }

        let data = self
            .server
            .trickplay_sheet(
                item_id,
                descriptor.sheet_width,
                sheet_index,
                &descriptor.media_source_id,
            )
            .await
            .map_err(|e| PreviewError::sheet(sheet_index, format!("{:#}", e)))?;

        debug!(sheet_index, bytes = data.len(), "Decoding tile sheet");

        let sheet = tokio::task::spawn_blocking(move || decode_sheet(&data))
            .await
            .map_err(|e| PreviewError::sheet(sheet_index, e))?
            .map_err(|e| PreviewError::sheet(sheet_index, e))?;
        let sheet = Arc::new(sheet);

        if let Some(cache) = &self.sheets {
            if self.generation() == generation {
                cache.put(sheet_index, Arc::clone(&sheet));
            } else {
                debug!(sheet_index, "Fetcher cleared mid-flight, not caching sheet");
            }
        }

        Ok(sheet)
    }

    /// Drop all cached sheets and start a new generation.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(cache) = &self.sheets {
            cache.clear();
        }
    }

    pub fn cached_sheets(&self) -> usize {
        self.sheets.as_ref().map_or(0, SheetCache::len)
    }
}

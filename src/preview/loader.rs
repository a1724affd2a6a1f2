//! The scrub-preview facade handed to the scrub overlay.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::DynamicImage;
use scrubview_common::ItemId;
use scrubview_media::{extract_thumbnail, TileGeometry, TrickplayDescriptor};
use tracing::{debug, warn};

use super::cache::PreviewCache;
use super::resolver::TrickplayInfoResolver;
use super::sheet::TileSheetFetcher;
use super::PreviewError;
use crate::client::MediaServer;
use crate::config::{OutOfRangePolicy, PreviewConfig};

/// Interval reported before the descriptor is known.
pub const DEFAULT_PREVIEW_INTERVAL: Duration = Duration::from_millis(10_000);

/// A preview result tagged with the request that produced it.
#[derive(Debug, Clone)]
pub struct TaggedPreview {
    /// Sequence number of the request; higher is newer.
    pub seq: u64,
    /// Position that was requested.
    pub position_ms: u64,
    /// The thumbnail, if one could be produced.
    pub image: Option<Arc<DynamicImage>>,
}

/// Scrub previews for one item.
///
/// Each loader owns its descriptor, its caches, and its server handle; nothing
/// is shared between loaders. All methods take `&self`, so a loader can sit
/// behind an `Arc` and serve concurrent requests from the overlay.
pub struct PreviewLoader {
    item_id: ItemId,
    resolver: TrickplayInfoResolver,
    sheets: TileSheetFetcher,
    cache: PreviewCache,
    fallback_interval: Duration,
    out_of_range: OutOfRangePolicy,
    latest_seq: AtomicU64,
}

impl PreviewLoader {
    pub fn new(server: Arc<dyn MediaServer>, item_id: ItemId, config: &PreviewConfig) -> Self {
        Self {
            item_id,
            resolver: TrickplayInfoResolver::new(
                Arc::clone(&server),
                item_id,
                config.variant_selection(),
            ),
            sheets: TileSheetFetcher::new(server, config.sheet_cache_capacity),
            cache: PreviewCache::new(config.cache_capacity, config.eviction_batch),
            fallback_interval: config.fallback_interval(),
            out_of_range: config.out_of_range,
            latest_seq: AtomicU64::new(0),
        }
    }

    /// Loader with default settings.
    pub fn with_defaults(server: Arc<dyn MediaServer>, item_id: ItemId) -> Self {
        Self::new(server, item_id, &PreviewConfig::default())
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// Thumbnail for `position_ms`, or `None` if no preview can be produced.
    ///
    /// Failures are logged, never returned: previews are best-effort.
    pub async fn load_preview(&self, position_ms: u64) -> Option<Arc<DynamicImage>> {
        match self.try_load_preview(position_ms).await {
            Ok(image) => Some(image),
            Err(e) if e.is_expected() => {
                debug!(item = %self.item_id, position_ms, "No preview: {}", e);
                None
            }
            Err(e) => {
                warn!(item = %self.item_id, position_ms, "Preview failed: {}", e);
                None
            }
        }
    }

    /// Like [`load_preview`](Self::load_preview) but reports why a preview is missing.
    pub async fn try_load_preview(
        &self,
        position_ms: u64,
    ) -> Result<Arc<DynamicImage>, PreviewError> {
        let generation = self.sheets.generation();
        if let Some(image) = self.cache.get(&position_ms) {
            debug!(position_ms, "Preview cache hit");
            return Ok(image);
        }

        let descriptor = self.resolver.resolve().await?;
        let address = TileGeometry::from(descriptor.as_ref()).address_of(position_ms);

        if !address.is_within(&descriptor) {
            match self.out_of_range {
                OutOfRangePolicy::Reject => {
                    return Err(PreviewError::OutOfRange {
                        thumbnail_index: address.thumbnail_index,
                        thumbnail_count: descriptor.thumbnail_count,
                    });
                }
                OutOfRangePolicy::Attempt => {
                    debug!(
                        thumbnail_index = address.thumbnail_index,
                        thumbnail_count = descriptor.thumbnail_count,
                        "Fetching past the advertised thumbnails"
                    );
                }
            }
        }

        let sheet = self
            .sheets
            .fetch_sheet(self.item_id, address.sheet_index, &descriptor, generation)
            .await?;

        let crop_descriptor = Arc::clone(&descriptor);
        let thumbnail = tokio::task::spawn_blocking(move || {
            extract_thumbnail(&sheet, address.tile_x, address.tile_y, &crop_descriptor)
        })
        .await
        .map_err(|e| PreviewError::ExtractionFailed(e.to_string()))??;

        let thumbnail = Arc::new(thumbnail);
        if self.sheets.generation() != generation {
            debug!(position_ms, "Loader released mid-flight, not caching preview");
            return Ok(thumbnail);
        }

        let evicted = self.cache.put(position_ms, Arc::clone(&thumbnail));
        debug!(
            position_ms,
            sheet = address.sheet_index,
            tile_x = address.tile_x,
            tile_y = address.tile_y,
            evicted,
            "Preview cached"
        );

        Ok(thumbnail)
    }

    /// Load a preview tagged with a fresh sequence number.
    ///
    /// Requests are not cancelled when a newer position arrives. The overlay
    /// should drop any result for which [`is_latest`](Self::is_latest) is false.
    pub async fn load_preview_tagged(&self, position_ms: u64) -> TaggedPreview {
        let seq = self.latest_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let image = self.load_preview(position_ms).await;
        TaggedPreview {
            seq,
            position_ms,
            image,
        }
    }

    /// Whether `seq` belongs to the most recently issued tagged request.
    pub fn is_latest(&self, seq: u64) -> bool {
        self.latest_seq.load(Ordering::SeqCst) == seq
    }

    /// Spacing between distinct thumbnails, or the fallback until it is known.
    pub fn preview_interval(&self) -> Duration {
        self.resolver
            .peek()
            .map(|d| Duration::from_millis(d.interval_ms.get()))
            .unwrap_or(self.fallback_interval)
    }

    /// The resolved descriptor, without triggering a fetch.
    pub fn descriptor(&self) -> Option<Arc<TrickplayDescriptor>> {
        self.resolver.peek()
    }

    /// Resolve the descriptor now (at most one fetch per loader).
    pub async fn resolve_descriptor(&self) -> Result<Arc<TrickplayDescriptor>, PreviewError> {
        self.resolver.resolve().await
    }

    pub fn cached_previews(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached preview and sheet. Safe to call repeatedly.
    ///
    /// Loads still in flight complete for their callers, but their sheets and
    /// thumbnails are not cached.
    pub fn release(&self) {
        let previews = self.cache.len();
        self.sheets.clear();
        self.cache.clear();
        debug!(item = %self.item_id, previews, "Released preview loader");
    }
}

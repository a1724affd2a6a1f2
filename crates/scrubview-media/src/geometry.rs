//! Tile geometry: mapping a playback position onto a tile sheet.
//!
//! ```text
//! thumbnail_index = position_ms / interval_ms
//! sheet_index     = thumbnail_index / (tile_count_x * tile_count_y)
//! tile_in_sheet   = thumbnail_index % (tile_count_x * tile_count_y)
//! tile_x          = tile_in_sheet % tile_count_x
//! tile_y          = tile_in_sheet / tile_count_x
//! ```
//!
//! The mapping is total: every position yields an address with
//! `tile_x < tile_count_x` and `tile_y < tile_count_y`. It is not bounded by
//! the descriptor's thumbnail count, so positions past the last thumbnail
//! produce addresses of sheets the server may not have. Callers decide what to
//! do with those via [`ThumbnailAddress::is_within`].

use std::num::{NonZeroU32, NonZeroU64};

use crate::descriptor::TrickplayDescriptor;

/// Location of one thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThumbnailAddress {
    /// Zero-based ordinal across the whole timeline.
    pub thumbnail_index: u64,
    /// Sheet holding the thumbnail.
    pub sheet_index: u64,
    /// Column within the sheet.
    pub tile_x: u32,
    /// Row within the sheet.
    pub tile_y: u32,
}

impl ThumbnailAddress {
    /// Whether the server advertises a thumbnail at this index.
    pub fn is_within(&self, descriptor: &TrickplayDescriptor) -> bool {
        self.thumbnail_index < u64::from(descriptor.thumbnail_count)
    }
}

/// The grid shape and sampling interval needed for address arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    tile_count_x: NonZeroU32,
    tile_count_y: NonZeroU32,
    interval_ms: NonZeroU64,
}

impl TileGeometry {
    /// Build a geometry from its parts.
    pub fn new(
        tile_count_x: NonZeroU32,
        tile_count_y: NonZeroU32,
        interval_ms: NonZeroU64,
    ) -> Self {
        Self {
            tile_count_x,
            tile_count_y,
            interval_ms,
        }
    }

    /// Tiles held by one sheet.
    pub fn tiles_per_sheet(&self) -> u64 {
        u64::from(self.tile_count_x.get()) * u64::from(self.tile_count_y.get())
    }

    /// Address of the thumbnail covering `position_ms`.
    pub fn address_of(&self, position_ms: u64) -> ThumbnailAddress {
        let thumbnail_index = position_ms / self.interval_ms.get();
        let tiles_per_sheet = self.tiles_per_sheet();
        let sheet_index = thumbnail_index / tiles_per_sheet;
        let tile_in_sheet = thumbnail_index % tiles_per_sheet;
        let columns = u64::from(self.tile_count_x.get());

        // tile_in_sheet < x * y, so both results fit in u32.
        ThumbnailAddress {
            thumbnail_index,
            sheet_index,
            tile_x: (tile_in_sheet % columns) as u32,
            tile_y: (tile_in_sheet / columns) as u32,
        }
    }

    /// First playback position (ms) covered by the thumbnail at `thumbnail_index`.
    pub fn position_of(&self, thumbnail_index: u64) -> u64 {
        thumbnail_index.saturating_mul(self.interval_ms.get())
    }
}

impl From<&TrickplayDescriptor> for TileGeometry {
    fn from(descriptor: &TrickplayDescriptor) -> Self {
        Self::new(
            descriptor.tile_count_x,
            descriptor.tile_count_y,
            descriptor.interval_ms,
        )
    }
}

/// Address of the thumbnail covering `position_ms` under `descriptor`.
pub fn address_of(position_ms: u64, descriptor: &TrickplayDescriptor) -> ThumbnailAddress {
    TileGeometry::from(descriptor).address_of(position_ms)
}

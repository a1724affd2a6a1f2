//! In-memory media server for preview unit tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::num::{NonZeroU32, NonZeroU64};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use image::{DynamicImage, Rgb, RgbImage};
use scrubview_common::{ItemId, MediaSourceId};
use scrubview_media::TrickplayDescriptor;

use crate::client::MediaServer;

pub struct FakeServer {
    item: Option<Vec<u8>>,
    sheets: HashMap<u64, Vec<u8>>,
    delay: Duration,
    item_fetches: AtomicUsize,
    sheet_fetches: AtomicUsize,
}

impl FakeServer {
    pub fn new(item: Vec<u8>) -> Self {
        Self {
            item: Some(item),
            sheets: HashMap::new(),
            delay: Duration::ZERO,
            item_fetches: AtomicUsize::new(0),
            sheet_fetches: AtomicUsize::new(0),
        }
    }

    /// A server whose item endpoint always errors.
    pub fn failing_item() -> Self {
        Self {
            item: None,
            ..Self::new(Vec::new())
        }
    }

    pub fn with_sheet(mut self, index: u64, data: Vec<u8>) -> Self {
        self.sheets.insert(index, data);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn item_fetches(&self) -> usize {
        self.item_fetches.load(Ordering::SeqCst)
    }

    pub fn sheet_fetches(&self) -> usize {
        self.sheet_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MediaServer for FakeServer {
    async fn item_document(&self, _item_id: ItemId) -> anyhow::Result<Bytes> {
        self.item_fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.item {
            Some(body) => Ok(Bytes::from(body.clone())),
            None => anyhow::bail!("connection refused"),
        }
    }

    async fn trickplay_sheet(
        &self,
        _item_id: ItemId,
        _sheet_width: u32,
        sheet_index: u64,
        _media_source_id: &MediaSourceId,
    ) -> anyhow::Result<Bytes> {
        self.sheet_fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.sheets.get(&sheet_index) {
            Some(data) => Ok(Bytes::from(data.clone())),
            None => anyhow::bail!("GET sheet {} failed (404 Not Found)", sheet_index),
        }
    }
}

/// Item document with a single trickplay variant.
pub fn item_body(tiles_x: u32, tiles_y: u32, interval_ms: u64, thumbnails: u32) -> Vec<u8> {
    serde_json::json!({
        "Name": "Test Item",
        "Trickplay": {
            "src": {
                "320": {
                    "Width": 320,
                    "Height": 180,
                    "TileWidth": tiles_x,
                    "TileHeight": tiles_y,
                    "ThumbnailCount": thumbnails,
                    "Interval": interval_ms,
                    "Bandwidth": 1000
                }
            }
        }
    })
    .to_string()
    .into_bytes()
}

pub fn descriptor(
    tiles_x: u32,
    tiles_y: u32,
    interval_ms: u64,
    thumbnails: u32,
) -> TrickplayDescriptor {
    TrickplayDescriptor {
        sheet_width: 320,
        sheet_height: 180,
        tile_count_x: NonZeroU32::new(tiles_x).unwrap(),
        tile_count_y: NonZeroU32::new(tiles_y).unwrap(),
        thumbnail_count: thumbnails,
        interval_ms: NonZeroU64::new(interval_ms).unwrap(),
        bandwidth: 0,
        media_source_id: MediaSourceId::new("src"),
    }
}

/// Color of the tile at (`col`, `row`) in sheets made by [`grid_jpeg`].
pub fn tile_color(col: u32, row: u32) -> [u8; 3] {
    [(col * 60).min(255) as u8, (row * 60).min(255) as u8, 128]
}

/// JPEG sheet of `cols` x `rows` flat-colored tiles.
pub fn grid_jpeg(cols: u32, rows: u32, tile_w: u32, tile_h: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(cols * tile_w, rows * tile_h, |x, y| {
        Rgb(tile_color(x / tile_w, y / tile_h))
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Jpeg)
        .unwrap();
    buf.into_inner()
}

/// Whether `actual` is within JPEG noise of `expected`.
pub fn close_to(actual: [u8; 3], expected: [u8; 3]) -> bool {
    actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.abs_diff(*e) <= 12)
}

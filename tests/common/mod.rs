//! Shared test harness for integration tests.
//!
//! Provides [`TestServer`], a wiremock-backed stand-in for a Jellyfin server
//! that serves one item document and a set of tile sheets, plus helpers for
//! building trickplay fixtures.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, Rgb, RgbImage};
use scrubview::config::PreviewConfig;
use scrubview::{JellyfinClient, PreviewLoader};
use scrubview_common::{ItemId, UserId};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-token";
pub const MEDIA_SOURCE: &str = "5f1e0c3a9d7b4e2f8a6c1b3d5e7f9a0b";

/// A mock media server with known ids.
pub struct TestServer {
    pub mock: MockServer,
    pub user_id: UserId,
    pub item_id: ItemId,
}

impl TestServer {
    /// Start a mock server with nothing mounted.
    pub async fn start() -> Self {
        Self {
            mock: MockServer::start().await,
            user_id: UserId::new(),
            item_id: ItemId::new(),
        }
    }

    pub fn item_path(&self) -> String {
        format!("/Users/{}/Items/{}", self.user_id, self.item_id)
    }

    pub fn sheet_path(&self, width: u32, index: u64) -> String {
        format!("/Videos/{}/Trickplay/{}/{}.jpg", self.item_id, width, index)
    }

    /// Serve `body` as the item document, expecting it to be fetched `times` times.
    pub async fn mount_item(&self, body: serde_json::Value, times: u64) {
        Mock::given(method("GET"))
            .and(path(self.item_path()))
            .and(header("X-Emby-Token", API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(times)
            .mount(&self.mock)
            .await;
    }

    /// Serve a grid sheet at `index`, expecting `times` fetches.
    pub async fn mount_sheet(&self, width: u32, index: u64, jpeg: Vec<u8>, times: u64) {
        Mock::given(method("GET"))
            .and(path(self.sheet_path(width, index)))
            .and(query_param("mediaSourceId", MEDIA_SOURCE))
            .and(header("X-Emby-Token", API_KEY))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/jpeg")
                    .set_body_bytes(jpeg),
            )
            .expect(times)
            .mount(&self.mock)
            .await;
    }

    /// Respond to any sheet request at `index` with `status`.
    pub async fn mount_sheet_status(&self, width: u32, index: u64, status: u16) {
        Mock::given(method("GET"))
            .and(path(self.sheet_path(width, index)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock)
            .await;
    }

    pub fn client(&self) -> JellyfinClient {
        JellyfinClient::with_timeout(
            &self.mock.uri(),
            API_KEY,
            self.user_id,
            std::time::Duration::from_secs(5),
        )
    }

    pub fn loader(&self) -> PreviewLoader {
        self.loader_with(&PreviewConfig::default())
    }

    pub fn loader_with(&self, config: &PreviewConfig) -> PreviewLoader {
        PreviewLoader::new(Arc::new(self.client()), self.item_id, config)
    }
}

/// Item document carrying one trickplay variant under [`MEDIA_SOURCE`].
pub fn item_json(width: u32, tiles: u32, interval_ms: u64, thumbnails: u32) -> serde_json::Value {
    serde_json::json!({
        "Name": "Big Buck Bunny",
        "Id": "ignored",
        "RunTimeTicks": 5_960_000_000u64,
        "Trickplay": {
            MEDIA_SOURCE: {
                width.to_string(): {
                    "Width": width,
                    "Height": width * 9 / 16,
                    "TileWidth": tiles,
                    "TileHeight": tiles,
                    "ThumbnailCount": thumbnails,
                    "Interval": interval_ms,
                    "Bandwidth": 24_000
                }
            }
        }
    })
}

/// Color of tile (`col`, `row`) in sheets made by [`grid_jpeg`].
pub fn tile_color(col: u32, row: u32) -> [u8; 3] {
    [(col * 25).min(255) as u8, (row * 25).min(255) as u8, 90]
}

/// JPEG sheet of flat-colored tiles.
pub fn grid_jpeg(cols: u32, rows: u32, tile_w: u32, tile_h: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(cols * tile_w, rows * tile_h, |x, y| {
        Rgb(tile_color(x / tile_w, y / tile_h))
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Jpeg)
        .expect("failed to encode test sheet");
    buf.into_inner()
}

/// Center pixel of a thumbnail.
pub fn center_color(image: &DynamicImage) -> [u8; 3] {
    let rgb = image.to_rgb8();
    rgb.get_pixel(rgb.width() / 2, rgb.height() / 2).0
}

/// Whether two colors match within JPEG noise.
pub fn close_to(actual: [u8; 3], expected: [u8; 3]) -> bool {
    actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.abs_diff(*e) <= 12)
}

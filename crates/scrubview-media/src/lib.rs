//! Scrubview-Media: trickplay descriptors, tile geometry, and thumbnail extraction
//!
//! This crate holds the I/O-free half of scrub previews. Given the bytes of
//! an item detail document and of a tile sheet, it can tell which tile of
//! which sheet covers a playback position and cut that tile out.
//!
//! # Modules
//!
//! - `descriptor` - Structured parsing of the item document's trickplay mapping
//! - `geometry` - Position to (sheet, column, row) arithmetic
//! - `extract` - Sheet decoding and tile cropping
//!
//! # Example
//!
//! ```
//! use scrubview_media::{parse_item_document, address_of, VariantSelection};
//!
//! let body = br#"{"Trickplay":{"src":{"320":{"Width":320,"Height":180,
//!     "TileWidth":10,"TileHeight":10,"ThumbnailCount":529,"Interval":10000}}}}"#;
//! let descriptor = parse_item_document(body, &VariantSelection::FirstEncountered).unwrap();
//!
//! let addr = address_of(125_000, &descriptor);
//! assert_eq!((addr.sheet_index, addr.tile_x, addr.tile_y), (0, 2, 1));
//! ```

pub mod descriptor;
pub mod error;
pub mod extract;
pub mod geometry;

pub use descriptor::{parse_item_document, TrickplayDescriptor, TrickplayManifest, VariantSelection};
pub use error::{Error, Result};
pub use extract::{decode_sheet, extract_thumbnail, thumbnail_size};
pub use geometry::{address_of, ThumbnailAddress, TileGeometry};

//! Trickplay scrub previews.
//!
//! [`PreviewLoader`] is the entry point: it turns a scrub position into a
//! cropped thumbnail, resolving the item's trickplay descriptor once and
//! caching what it produces.
//!
//! # Module layout
//!
//! - [`resolver`] -- Single-flight descriptor resolution.
//! - [`sheet`] -- Tile sheet download and decode.
//! - [`cache`] -- Bounded, insertion-ordered caches.
//! - [`loader`] -- The facade tying them together.

pub mod cache;
mod error;
pub mod loader;
pub mod resolver;
pub mod sheet;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{OrderedCache, PreviewCache};
pub use error::PreviewError;
pub use loader::{PreviewLoader, TaggedPreview, DEFAULT_PREVIEW_INTERVAL};
pub use resolver::TrickplayInfoResolver;
pub use sheet::TileSheetFetcher;

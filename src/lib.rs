//! Scrubview - Trickplay scrub previews for Jellyfin-compatible servers
//!
//! This library crate exposes the preview loader, its HTTP transport, and
//! configuration loading for the `scrubview` binary and integration tests.

pub mod client;
pub mod config;
pub mod preview;

pub use client::{JellyfinClient, MediaServer};
pub use preview::{PreviewError, PreviewLoader, TaggedPreview};

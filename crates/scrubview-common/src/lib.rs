//! Scrubview-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across scrubview:
//!
//! - **Typed IDs**: Wrappers for user, item, and media source identifiers,
//!   rendered the way the media server expects them in URLs
//! - **Time Units**: Conversions between milliseconds, server ticks, and
//!   human-readable timestamps
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use scrubview_common::{ItemId, Result};
//! use scrubview_common::time::{parse_timestamp, ticks_to_ms};
//!
//! let item: ItemId = "f27caa37e5142225cceded48f6553502".parse().unwrap();
//! assert_eq!(item.to_string(), "f27caa37e5142225cceded48f6553502");
//!
//! assert_eq!(parse_timestamp("00:02:05").unwrap(), 125_000);
//! assert_eq!(ticks_to_ms(1_250_000_000), 125_000);
//!
//! fn example() -> Result<u64> {
//!     parse_timestamp("1:00")
//! }
//! # assert_eq!(example().unwrap(), 60_000);
//! ```

pub mod error;
pub mod ids;
pub mod time;

pub use error::{Error, Result};
pub use ids::*;

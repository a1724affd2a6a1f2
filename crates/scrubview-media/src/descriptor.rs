//! Trickplay descriptors and the item-document parser that produces them.
//!
//! The item detail document carries trickplay data as a nested mapping:
//!
//! ```text
//! "Trickplay": {
//!     "<media source id>": {
//!         "<sheet width>": { "Width": .., "Height": .., "TileWidth": ..,
//!                            "TileHeight": .., "ThumbnailCount": ..,
//!                            "Interval": .., "Bandwidth": .. }
//!     }
//! }
//! ```
//!
//! [`TrickplayManifest`] deserializes that structure in document order and
//! [`VariantSelection`] picks one `(media source, width)` pair out of it.

use std::num::{NonZeroU32, NonZeroU64};

use scrubview_common::MediaSourceId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Key under which the item document embeds trickplay data.
pub const TRICKPLAY_KEY: &str = "Trickplay";

/// Everything needed to address and fetch thumbnails for one item.
///
/// Tile counts and the sampling interval are non-zero by construction, so
/// geometry derived from a descriptor never divides by zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrickplayDescriptor {
    /// Width reported for the sheet; also the width segment of sheet URLs.
    pub sheet_width: u32,
    /// Height reported for the sheet.
    pub sheet_height: u32,
    /// Tiles per sheet along the x axis.
    pub tile_count_x: NonZeroU32,
    /// Tiles per sheet along the y axis.
    pub tile_count_y: NonZeroU32,
    /// Thumbnails available across all sheets.
    pub thumbnail_count: u32,
    /// Milliseconds between consecutive thumbnails.
    pub interval_ms: NonZeroU64,
    /// Informational only.
    pub bandwidth: u64,
    /// Media source this variant belongs to.
    pub media_source_id: MediaSourceId,
}

impl TrickplayDescriptor {
    /// Tiles held by one sheet.
    pub fn tiles_per_sheet(&self) -> u64 {
        u64::from(self.tile_count_x.get()) * u64::from(self.tile_count_y.get())
    }

    /// Number of sheets needed to hold every thumbnail.
    pub fn sheet_count(&self) -> u64 {
        u64::from(self.thumbnail_count).div_ceil(self.tiles_per_sheet())
    }

    /// Playback time covered by the advertised thumbnails, in milliseconds.
    pub fn covered_ms(&self) -> u64 {
        u64::from(self.thumbnail_count).saturating_mul(self.interval_ms.get())
    }
}

/// Raw per-variant record as the server spells it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrickplayInfoDto {
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
    thumbnail_count: u32,
    interval: u64,
    #[serde(default)]
    bandwidth: u64,
}

impl TrickplayInfoDto {
    fn into_descriptor(self, media_source_id: MediaSourceId) -> Result<TrickplayDescriptor> {
        let tile_count_x = NonZeroU32::new(self.tile_width)
            .ok_or_else(|| Error::malformed("TileWidth must be greater than zero"))?;
        let tile_count_y = NonZeroU32::new(self.tile_height)
            .ok_or_else(|| Error::malformed("TileHeight must be greater than zero"))?;
        let interval_ms = NonZeroU64::new(self.interval)
            .ok_or_else(|| Error::malformed("Interval must be greater than zero"))?;

        Ok(TrickplayDescriptor {
            sheet_width: self.width,
            sheet_height: self.height,
            tile_count_x,
            tile_count_y,
            thumbnail_count: self.thumbnail_count,
            interval_ms,
            bandwidth: self.bandwidth,
            media_source_id,
        })
    }
}

/// How to choose one variant when an item advertises several.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VariantSelection {
    /// The first `(media source, width)` pair in document order.
    ///
    /// This is a positional tie-break, not a quality judgement.
    #[default]
    FirstEncountered,
    /// The first width listed for the given media source.
    MediaSource(MediaSourceId),
}

/// One `(media source, width)` entry of the trickplay mapping, not yet validated.
#[derive(Debug, Clone)]
struct Variant {
    media_source_id: MediaSourceId,
    width_key: String,
    fields: Value,
}

impl Variant {
    fn descriptor(&self) -> Result<TrickplayDescriptor> {
        let dto: TrickplayInfoDto = TrickplayInfoDto::deserialize(&self.fields).map_err(|e| {
            Error::malformed(format!(
                "media source {} width {}: {}",
                self.media_source_id, self.width_key, e
            ))
        })?;
        dto.into_descriptor(self.media_source_id.clone())
    }
}

/// All trickplay variants of one item, in document order.
#[derive(Debug, Clone)]
pub struct TrickplayManifest {
    variants: Vec<Variant>,
}

impl TrickplayManifest {
    /// Parse the manifest out of a raw item detail document.
    pub fn from_item_json(body: &[u8]) -> Result<Self> {
        let doc: Value = serde_json::from_slice(body)
            .map_err(|e| Error::malformed(format!("item document is not valid JSON: {e}")))?;
        Self::from_item_value(&doc)
    }

    /// Parse the manifest out of an already-decoded item detail document.
    ///
    /// Fails with [`Error::MetadataUnavailable`] when the document has no
    /// trickplay entry (or an empty one) and with
    /// [`Error::MalformedDescriptor`] when the entry is not a mapping of
    /// mappings.
    pub fn from_item_value(doc: &Value) -> Result<Self> {
        let trickplay = match doc.get(TRICKPLAY_KEY) {
            None | Some(Value::Null) => {
                return Err(Error::unavailable("item document has no Trickplay entry"));
            }
            Some(value) => value,
        };

        let sources: Map<String, Value> = Map::deserialize(trickplay)
            .map_err(|e| Error::malformed(format!("Trickplay is not a mapping: {e}")))?;

        let mut variants = Vec::new();
        for (source_id, widths) in sources {
            let widths: Map<String, Value> = Map::deserialize(&widths).map_err(|e| {
                Error::malformed(format!("Trickplay[{source_id}] is not a mapping: {e}"))
            })?;
            let media_source_id = MediaSourceId::new(source_id);
            for (width_key, fields) in widths {
                variants.push(Variant {
                    media_source_id: media_source_id.clone(),
                    width_key,
                    fields,
                });
            }
        }

        if variants.is_empty() {
            return Err(Error::unavailable("Trickplay entry lists no variants"));
        }

        Ok(Self { variants })
    }

    /// Number of `(media source, width)` pairs.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Whether the manifest holds no variants. Never true for a parsed manifest.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Choose and validate one variant.
    pub fn select(&self, selection: &VariantSelection) -> Result<TrickplayDescriptor> {
        let variant = match selection {
            VariantSelection::FirstEncountered => self.variants.first(),
            VariantSelection::MediaSource(wanted) => self
                .variants
                .iter()
                .find(|v| &v.media_source_id == wanted),
        };

        match variant {
            Some(v) => v.descriptor(),
            None => Err(Error::unavailable(match selection {
                VariantSelection::MediaSource(wanted) => {
                    format!("no trickplay variant for media source {wanted}")
                }
                VariantSelection::FirstEncountered => "no trickplay variants".to_string(),
            })),
        }
    }

    /// Validate every variant, in document order.
    pub fn descriptors(&self) -> impl Iterator<Item = Result<TrickplayDescriptor>> + '_ {
        self.variants.iter().map(Variant::descriptor)
    }
}

/// Parse an item detail document and select one descriptor.
pub fn parse_item_document(
    body: &[u8],
    selection: &VariantSelection,
) -> Result<TrickplayDescriptor> {
    TrickplayManifest::from_item_json(body)?.select(selection)
}

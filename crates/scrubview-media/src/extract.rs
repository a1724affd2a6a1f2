//! Tile sheet decoding and thumbnail extraction.

use image::{DynamicImage, GenericImageView};

use crate::descriptor::TrickplayDescriptor;
use crate::error::{Error, Result};

/// Decode a tile sheet payload (JPEG from the server) into a bitmap.
pub fn decode_sheet(data: &[u8]) -> Result<DynamicImage> {
    if data.is_empty() {
        return Err(Error::Decode("empty payload".to_string()));
    }
    image::load_from_memory(data).map_err(|e| Error::Decode(e.to_string()))
}

/// Pixel size of a single thumbnail within `sheet`.
///
/// Sheets are expected to divide evenly; any remainder pixels on the right or
/// bottom edge are ignored.
pub fn thumbnail_size(sheet: &DynamicImage, descriptor: &TrickplayDescriptor) -> (u32, u32) {
    let (width, height) = sheet.dimensions();
    (
        width / descriptor.tile_count_x.get(),
        height / descriptor.tile_count_y.get(),
    )
}

/// Crop the thumbnail at column `tile_x`, row `tile_y` out of `sheet`.
///
/// The thumbnail size comes from the decoded sheet, not from the descriptor's
/// reported dimensions.
pub fn extract_thumbnail(
    sheet: &DynamicImage,
    tile_x: u32,
    tile_y: u32,
    descriptor: &TrickplayDescriptor,
) -> Result<DynamicImage> {
    let fail = |reason: String| Error::ExtractionFailed {
        tile_x,
        tile_y,
        reason,
    };

    if tile_x >= descriptor.tile_count_x.get() || tile_y >= descriptor.tile_count_y.get() {
        return Err(fail(format!(
            "outside a {}x{} grid",
            descriptor.tile_count_x, descriptor.tile_count_y
        )));
    }

    let (thumb_width, thumb_height) = thumbnail_size(sheet, descriptor);
    if thumb_width == 0 || thumb_height == 0 {
        return Err(fail(format!(
            "sheet {}x{} is smaller than its {}x{} grid",
            sheet.width(),
            sheet.height(),
            descriptor.tile_count_x,
            descriptor.tile_count_y
        )));
    }

    let x = tile_x * thumb_width;
    let y = tile_y * thumb_height;

    Ok(sheet.crop_imm(x, y, thumb_width, thumb_height))
}

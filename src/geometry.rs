#![forbid(unsafe_code)]

//! Picks a sheet size for a headerless blob.
//!
//! Raw tile data has no header, so the blob's length is the only thing we
//! can go on. Small blobs become a single row of tiles. Larger blobs wrap at
//! the format's default row width, and the final row is padded out to a
//! whole row of tiles.

use crate::{FormatDescriptor, TileError};

/// The size of a sheet, as inferred from a blob length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Geometry {
  /// Pixels per row, a multiple of 8.
  pub width: u32,
  /// Pixel rows, a multiple of 8.
  pub height: u32,
  /// Complete tiles present in the blob.
  pub tile_count: u64,
  /// Trailing bytes that don't make up a full tile.
  pub surplus: u64,
}
impl Geometry {
  /// Tile slots in the sheet, including padding slots.
  #[inline]
  #[must_use]
  pub const fn slot_count(&self) -> u64 {
    (self.width / FormatDescriptor::TILE_WIDTH) as u64
      * (self.height / FormatDescriptor::TILE_HEIGHT) as u64
  }

  /// Slots with no source data behind them.
  #[inline]
  #[must_use]
  pub const fn padding_count(&self) -> u64 {
    self.slot_count() - self.tile_count
  }
}

/// Works out the sheet size for a blob of `blob_len` bytes.
///
/// ## Failure
/// * Whatever [`FormatDescriptor::validate`] rejects.
/// * [`TileError::ZeroTileCount`] if the blob is shorter than one tile.
/// * [`TileError::DimensionsTooLarge`] if the sheet would be taller than a
///   `u32` can describe.
#[inline]
pub fn infer_geometry(blob_len: u64, format: &FormatDescriptor) -> Result<Geometry, TileError> {
  format.validate()?;
  let tile_bytes = format.tile_byte_size() as u64;
  let tile_count = blob_len / tile_bytes;
  let surplus = blob_len % tile_bytes;
  if tile_count == 0 {
    return Err(TileError::ZeroTileCount);
  }
  let tile_w = u64::from(FormatDescriptor::TILE_WIDTH);
  let default_width = u64::from(format.default_width);
  let row_pixels = tile_count.checked_mul(tile_w).ok_or(TileError::DimensionsTooLarge)?;
  let width = if row_pixels < default_width { row_pixels } else { default_width };
  let tile_rows = row_pixels / default_width + u64::from(row_pixels % default_width != 0);
  let height = tile_rows
    .checked_mul(u64::from(FormatDescriptor::TILE_HEIGHT))
    .ok_or(TileError::DimensionsTooLarge)?;
  Ok(Geometry {
    width: u32::try_from(width)?,
    height: u32::try_from(height)?,
    tile_count,
    surplus,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::TileFormat;

  #[test]
  fn test_short_blob_is_one_row() {
    let g = infer_geometry(8 * 3, TileFormat::Nes1bpp.descriptor()).unwrap();
    assert_eq!((g.width, g.height, g.surplus), (24, 8, 0));
    assert_eq!(g.padding_count(), 0);
  }

  #[test]
  fn test_long_blob_wraps() {
    // 31 tiles at 16 tiles per row: two rows, one padding slot.
    let g = infer_geometry(8 * 31 + 5, TileFormat::Nes1bpp.descriptor()).unwrap();
    assert_eq!((g.width, g.height, g.tile_count, g.surplus), (128, 16, 31, 5));
    assert_eq!(g.slot_count(), 32);
    assert_eq!(g.padding_count(), 1);
  }

  #[test]
  fn test_exact_row_has_no_padding() {
    let g = infer_geometry(64 * 32, TileFormat::Gba8bpp.descriptor()).unwrap();
    assert_eq!((g.width, g.height), (256, 8));
    assert_eq!(g.padding_count(), 0);
  }

  #[test]
  fn test_3bpp_uses_24_byte_tiles() {
    let g = infer_geometry(24 * 2 + 23, TileFormat::Snes3bpp.descriptor()).unwrap();
    assert_eq!((g.width, g.height, g.tile_count, g.surplus), (16, 8, 2, 23));
  }

  #[test]
  fn test_too_short() {
    assert_eq!(infer_geometry(3, TileFormat::Nes1bpp.descriptor()), Err(TileError::ZeroTileCount));
    assert_eq!(infer_geometry(0, TileFormat::Gba4bpp.descriptor()), Err(TileError::ZeroTileCount));
  }

  #[test]
  fn test_hand_built_descriptor_checked() {
    let zero_width = FormatDescriptor { default_width: 0, ..*TileFormat::Nes1bpp.descriptor() };
    assert_eq!(infer_geometry(64, &zero_width), Err(TileError::InvalidRowWidth));
    let zero_depth = FormatDescriptor { bits_per_pixel: 0, ..*TileFormat::Nes1bpp.descriptor() };
    assert_eq!(infer_geometry(64, &zero_depth), Err(TileError::InvalidLayout));
  }

  #[test]
  fn test_too_tall() {
    assert_eq!(
      infer_geometry(u64::MAX, TileFormat::Nes1bpp.descriptor()),
      Err(TileError::DimensionsTooLarge)
    );
  }
}

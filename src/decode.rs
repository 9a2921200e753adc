#![forbid(unsafe_code)]

//! Turns raw tile data into a [`TileSheet`].

use alloc::vec::Vec;

use log::{debug, trace};

use crate::{
  builtin_palette, infer_geometry, FormatDescriptor, PixelBuffer, TileError, TileFormat, TileSheet,
  TILE_PIXELS, YA8,
};

/// Decodes raw tile data using the format's default row width.
///
/// See [`decode_with`].
#[inline]
pub fn decode(blob: &[u8], format: TileFormat) -> Result<TileSheet, TileError> {
  decode_with(blob, format.descriptor())
}

/// Decodes raw tile data.
///
/// Tiles are placed left to right, wrapping at `format.default_width`. If the
/// last row of tiles isn't full, the leftover slots are filled with index 0
/// and marked transparent. Any trailing bytes that don't make a whole tile
/// are returned as the sheet's surplus.
///
/// The pixel buffer only has an alpha channel when it's needed, which is when
/// there are padding slots or surplus bytes. Otherwise it's one index byte
/// per pixel.
///
/// ## Failure
/// * Whatever [`FormatDescriptor::validate`] rejects.
/// * [`TileError::ZeroTileCount`] if the blob doesn't hold even one tile.
/// * [`TileError::AllocationFailed`] if any buffer can't be allocated.
pub fn decode_with(blob: &[u8], format: &FormatDescriptor) -> Result<TileSheet, TileError> {
  let geometry = infer_geometry(blob.len() as u64, format)?;
  let has_alpha = geometry.padding_count() > 0 || geometry.surplus > 0;
  debug!(
    "decode {}: {} bytes -> {}x{}, {} tiles, {} padding, {} surplus bytes",
    format.slug,
    blob.len(),
    geometry.width,
    geometry.height,
    geometry.tile_count,
    geometry.padding_count(),
    geometry.surplus
  );

  let mut pixels =
    PixelBuffer::try_new(geometry.width, geometry.height, if has_alpha { 2 } else { 1 })?;
  let mut tiles = blob.chunks_exact(format.tile_byte_size());
  let mut indexes = [0_u8; TILE_PIXELS];
  for ty in 0..pixels.tiles_high() {
    for tx in 0..pixels.tiles_wide() {
      match tiles.next() {
        Some(tile) => {
          format.layout.decode_tile(format.bits_per_pixel, tile, &mut indexes);
          pixels.write_tile(tx, ty, &indexes, YA8::OPAQUE);
        }
        None => {
          trace!("decode {}: tile ({tx},{ty}) is padding", format.slug);
          pixels.write_tile(tx, ty, &[0; TILE_PIXELS], YA8::TRANSPARENT);
        }
      }
    }
  }

  let remainder = tiles.remainder();
  let surplus = if remainder.is_empty() {
    None
  } else {
    let mut v = Vec::new();
    v.try_reserve(remainder.len())?;
    v.extend_from_slice(remainder);
    Some(v)
  };

  let builtin = builtin_palette(format.num_colors)?;
  let mut palette = Vec::new();
  palette.try_reserve(builtin.len())?;
  palette.extend_from_slice(builtin);

  Ok(TileSheet { pixels, palette, surplus })
}

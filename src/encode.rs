#![forbid(unsafe_code)]

//! Turns a [`PixelBuffer`] back into raw tile data.

use alloc::vec::Vec;

use log::{debug, trace};

use crate::{FormatDescriptor, PixelBuffer, TileError, TileFormat, TILE_PIXELS};

/// Encodes a pixel buffer with a format's standard constants.
///
/// See [`encode_with`].
#[inline]
pub fn encode(
  pixels: &PixelBuffer, surplus: Option<&[u8]>, format: TileFormat,
) -> Result<Vec<u8>, TileError> {
  encode_with(pixels, surplus, format.descriptor())
}

/// Encodes a pixel buffer into raw tile data.
///
/// Tiles are written left to right, top to bottom. A tile where every pixel
/// is transparent is skipped entirely, so a sheet that was decoded from a
/// short blob encodes back to that same short length. Indexes are masked to
/// the format's bit depth. After the tiles, `surplus` is appended unchanged.
///
/// ## Failure
/// * Whatever [`FormatDescriptor::validate`] rejects.
/// * [`TileError::UnsupportedPixelDepth`] unless the buffer has 1 or 2 bytes
///   per pixel.
/// * [`TileError::DimensionsNotTileAligned`] or
///   [`TileError::PixelDataIllegalLength`] if the buffer's size is off.
/// * [`TileError::AllocationFailed`] if the output can't be allocated.
pub fn encode_with(
  pixels: &PixelBuffer, surplus: Option<&[u8]>, format: &FormatDescriptor,
) -> Result<Vec<u8>, TileError> {
  format.validate()?;
  pixels.validate()?;
  let tile_bytes = format.tile_byte_size();
  let surplus = surplus.unwrap_or(&[]);

  // Sizing pre-pass: transparent tiles contribute nothing.
  let mut transparent = 0_usize;
  for ty in 0..pixels.tiles_high() {
    for tx in 0..pixels.tiles_wide() {
      if pixels.tile_is_transparent(tx, ty) {
        transparent += 1;
      }
    }
  }
  let slots = (pixels.tiles_wide() as usize) * (pixels.tiles_high() as usize);
  let kept = slots - transparent;
  let out_len = kept
    .checked_mul(tile_bytes)
    .and_then(|len| len.checked_add(surplus.len()))
    .ok_or(TileError::AllocationFailed)?;
  debug!(
    "encode {}: {}x{} -> {} bytes, {} tiles kept, {} elided, {} surplus bytes",
    format.slug,
    pixels.width,
    pixels.height,
    out_len,
    kept,
    transparent,
    surplus.len()
  );

  let mut out = Vec::new();
  out.try_reserve(out_len)?;
  let mut indexes = [0_u8; TILE_PIXELS];
  let mut tile = [0_u8; TILE_PIXELS];
  let tile = &mut tile[..tile_bytes];
  for ty in 0..pixels.tiles_high() {
    for tx in 0..pixels.tiles_wide() {
      if pixels.tile_is_transparent(tx, ty) {
        trace!("encode {}: tile ({tx},{ty}) is transparent, skipping", format.slug);
        continue;
      }
      pixels.read_tile(tx, ty, &mut indexes);
      format.layout.encode_tile(format.bits_per_pixel, &indexes, tile);
      out.extend_from_slice(tile);
    }
  }
  out.extend_from_slice(surplus);
  debug_assert_eq!(out.len(), out_len);
  Ok(out)
}

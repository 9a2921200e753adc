#![forbid(unsafe_code)]

//! Provides the heap-allocated sheet types that decoding produces and
//! encoding consumes.

use alloc::vec::Vec;

use bitfrob::u8_replicate_bits;
use pixel_formats::r8g8b8a8_Srgb;

use crate::{FormatDescriptor, TileError, TileFormat, RGB8, TILE_DIM, TILE_PIXELS, YA8};

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// An image of palette indexes, optionally with an alpha byte per pixel.
///
/// With `bytes_per_pixel == 1` every byte is an index and every pixel is
/// authoritative. With `bytes_per_pixel == 2` the data is [`YA8`] pairs and
/// a zero alpha marks a pixel that has no source bytes behind it.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub struct PixelBuffer {
  pub width: u32,
  pub height: u32,
  pub bytes_per_pixel: u8,
  pub data: Vec<u8>,
}
impl PixelBuffer {
  /// The `data` length a buffer of this shape needs, without allocating.
  ///
  /// ## Failure
  /// * `bytes_per_pixel` must be 1 or 2.
  /// * `width` and `height` must be non-zero multiples of 8.
  /// * The length must fit in a `usize`.
  #[inline]
  pub fn byte_len_for(width: u32, height: u32, bytes_per_pixel: u8) -> Result<usize, TileError> {
    if !(1..=2).contains(&bytes_per_pixel) {
      return Err(TileError::UnsupportedPixelDepth);
    }
    if width == 0 || height == 0 || width % TILE_DIM != 0 || height % TILE_DIM != 0 {
      return Err(TileError::DimensionsNotTileAligned);
    }
    (width as usize)
      .checked_mul(height as usize)
      .and_then(|px| px.checked_mul(usize::from(bytes_per_pixel)))
      .ok_or(TileError::DimensionsTooLarge)
  }

  /// Allocates a zeroed buffer.
  ///
  /// ## Failure
  /// * Anything [`byte_len_for`](Self::byte_len_for) rejects.
  /// * The allocation can fail.
  #[inline]
  pub fn try_new(width: u32, height: u32, bytes_per_pixel: u8) -> Result<Self, TileError> {
    let len = Self::byte_len_for(width, height, bytes_per_pixel)?;
    let mut data = Vec::new();
    data.try_reserve(len)?;
    data.resize(len, 0);
    Ok(Self { width, height, bytes_per_pixel, data })
  }

  /// Checks that the buffer's fields agree with each other and describe whole
  /// tiles.
  #[inline]
  pub fn validate(&self) -> Result<(), TileError> {
    if !(1..=2).contains(&self.bytes_per_pixel) {
      return Err(TileError::UnsupportedPixelDepth);
    }
    if self.width == 0
      || self.height == 0
      || self.width % TILE_DIM != 0
      || self.height % TILE_DIM != 0
    {
      return Err(TileError::DimensionsNotTileAligned);
    }
    let expected = (self.width as usize)
      .checked_mul(self.height as usize)
      .and_then(|px| px.checked_mul(usize::from(self.bytes_per_pixel)));
    if expected != Some(self.data.len()) {
      return Err(TileError::PixelDataIllegalLength);
    }
    Ok(())
  }

  /// If the buffer carries an alpha channel.
  #[inline]
  #[must_use]
  pub const fn has_alpha(&self) -> bool {
    self.bytes_per_pixel == 2
  }

  /// Tiles per row.
  #[inline]
  #[must_use]
  pub const fn tiles_wide(&self) -> u32 {
    self.width / TILE_DIM
  }

  /// Rows of tiles.
  #[inline]
  #[must_use]
  pub const fn tiles_high(&self) -> u32 {
    self.height / TILE_DIM
  }

  /// The data as index/alpha pairs, if there's an alpha channel.
  #[inline]
  #[must_use]
  pub fn as_ya8(&self) -> Option<&[YA8]> {
    if self.has_alpha() {
      bytemuck::try_cast_slice(&self.data).ok()
    } else {
      None
    }
  }

  #[inline]
  fn byte_index(&self, x: u32, y: u32) -> Option<usize> {
    if x < self.width && y < self.height {
      Some(xy_width_to_index(x, y, self.width) * usize::from(self.bytes_per_pixel))
    } else {
      None
    }
  }

  /// Gets the palette index at the position, or `None` if the position is
  /// out of bounds.
  #[inline]
  #[must_use]
  pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
    self.byte_index(x, y).and_then(|i| self.data.get(i).copied())
  }

  /// Sets the palette index at the position, leaving any alpha alone.
  #[inline]
  pub fn set_index(&mut self, x: u32, y: u32, index: u8) -> Option<()> {
    let i = self.byte_index(x, y)?;
    *self.data.get_mut(i)? = index;
    Some(())
  }

  /// If the pixel at the position came from source bytes, or `None` if the
  /// position is out of bounds.
  #[inline]
  #[must_use]
  pub fn is_authoritative(&self, x: u32, y: u32) -> Option<bool> {
    let i = self.byte_index(x, y)?;
    if self.has_alpha() {
      self.data.get(i + 1).map(|&a| a != YA8::TRANSPARENT)
    } else {
      Some(true)
    }
  }

  /// If every pixel of the tile at tile position `(tx, ty)` is transparent.
  ///
  /// Buffers without alpha never have transparent tiles, and neither do
  /// out of bounds tile positions.
  #[must_use]
  pub fn tile_is_transparent(&self, tx: u32, ty: u32) -> bool {
    if !self.has_alpha() || tx >= self.tiles_wide() || ty >= self.tiles_high() {
      return false;
    }
    let row_bytes = (self.width as usize) * 2;
    let tile_row_bytes = (TILE_DIM as usize) * 2;
    (0..TILE_DIM).all(|r| {
      let y = (ty * TILE_DIM + r) as usize;
      let start = y * row_bytes + (tx as usize) * tile_row_bytes;
      self.data.get(start..start + tile_row_bytes).map_or(false, |row| {
        row.chunks_exact(2).all(|px| px[1] == YA8::TRANSPARENT)
      })
    })
  }

  /// Copies out the tile at tile position `(tx, ty)` as 64 row-major indexes.
  pub(crate) fn read_tile(&self, tx: u32, ty: u32, out: &mut [u8; TILE_PIXELS]) {
    let bpp = usize::from(self.bytes_per_pixel);
    let row_bytes = (self.width as usize) * bpp;
    for r in 0..TILE_DIM as usize {
      let y = (ty * TILE_DIM) as usize + r;
      let start = y * row_bytes + (tx * TILE_DIM) as usize * bpp;
      let src = &self.data[start..start + (TILE_DIM as usize) * bpp];
      for (dst, px) in out[r * 8..(r + 1) * 8].iter_mut().zip(src.chunks_exact(bpp)) {
        *dst = px[0];
      }
    }
  }

  /// Writes 64 row-major indexes into the tile at tile position `(tx, ty)`,
  /// giving each pixel `alpha` if there's an alpha channel.
  pub(crate) fn write_tile(&mut self, tx: u32, ty: u32, indexes: &[u8; TILE_PIXELS], alpha: u8) {
    let bpp = usize::from(self.bytes_per_pixel);
    let row_bytes = (self.width as usize) * bpp;
    for r in 0..TILE_DIM as usize {
      let y = (ty * TILE_DIM) as usize + r;
      let start = y * row_bytes + (tx * TILE_DIM) as usize * bpp;
      let dst = &mut self.data[start..start + (TILE_DIM as usize) * bpp];
      for (px, &index) in dst.chunks_exact_mut(bpp).zip(&indexes[r * 8..(r + 1) * 8]) {
        px[0] = index;
        if let Some(a) = px.get_mut(1) {
          *a = alpha;
        }
      }
    }
  }

  /// Expands the indexes through a palette.
  ///
  /// Transparent pixels keep their zero alpha. Indexes past the end of the
  /// palette become opaque black.
  #[inline]
  pub fn to_rgba(&self, palette: &[RGB8]) -> Result<Vec<r8g8b8a8_Srgb>, TileError> {
    self.validate()?;
    let bpp = usize::from(self.bytes_per_pixel);
    let mut out = Vec::new();
    out.try_reserve(self.data.len() / bpp)?;
    for px in self.data.chunks_exact(bpp) {
      let RGB8 { r, g, b } = palette.get(usize::from(px[0])).copied().unwrap_or_default();
      let a = px.get(1).copied().unwrap_or(YA8::OPAQUE);
      out.push(r8g8b8a8_Srgb { r, g, b, a });
    }
    Ok(out)
  }

  /// Makes a grayscale view of the indexes, one byte per pixel.
  ///
  /// Each index is masked to the format's bit depth and then stretched to
  /// cover the full `0..=255` range, so the highest index is white.
  #[inline]
  pub fn to_gray_preview(&self, format: &FormatDescriptor) -> Result<Vec<u8>, TileError> {
    self.validate()?;
    let bpp = usize::from(self.bytes_per_pixel);
    let depth = u32::from(format.bits_per_pixel);
    let mask = ((1_u16 << depth) - 1) as u8;
    let mut out = Vec::new();
    out.try_reserve(self.data.len() / bpp)?;
    out.extend(self.data.chunks_exact(bpp).map(|px| u8_replicate_bits(depth, px[0] & mask)));
    Ok(out)
  }
}

/// Everything a decode produces, kept together so the surplus bytes can't
/// get separated from their pixels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TileSheet {
  /// The decoded indexes.
  pub pixels: PixelBuffer,
  /// The format's built-in palette.
  pub palette: Vec<RGB8>,
  /// Trailing bytes that didn't form a full tile, if any.
  pub surplus: Option<Vec<u8>>,
}
impl TileSheet {
  /// Packs the sheet back into raw tile data.
  ///
  /// This is [`encode`](crate::encode) with this sheet's pixels and surplus.
  #[inline]
  pub fn encode(&self, format: TileFormat) -> Result<Vec<u8>, TileError> {
    crate::encode(&self.pixels, self.surplus.as_deref(), format)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sheet_16x16_ya8() -> PixelBuffer {
    let mut p = PixelBuffer::try_new(16, 16, 2).unwrap();
    let opaque = [3_u8; 64];
    let mut blank = [0_u8; 64];
    blank[0] = 9;
    p.write_tile(0, 0, &opaque, YA8::OPAQUE);
    p.write_tile(1, 0, &opaque, YA8::OPAQUE);
    p.write_tile(0, 1, &opaque, YA8::OPAQUE);
    p.write_tile(1, 1, &blank, YA8::TRANSPARENT);
    p
  }

  #[test]
  fn test_try_new_checks() {
    assert_eq!(PixelBuffer::try_new(8, 8, 3), Err(TileError::UnsupportedPixelDepth));
    assert_eq!(PixelBuffer::try_new(12, 8, 1), Err(TileError::DimensionsNotTileAligned));
    assert_eq!(PixelBuffer::try_new(8, 0, 1), Err(TileError::DimensionsNotTileAligned));
    assert_eq!(PixelBuffer::try_new(8, 16, 2).unwrap().data.len(), 256);
    assert_eq!(PixelBuffer::byte_len_for(32768, 32768, 1), Ok(1 << 30));
    assert_eq!(PixelBuffer::byte_len_for(8, 8, 0), Err(TileError::UnsupportedPixelDepth));
  }

  #[test]
  fn test_validate() {
    let mut p = PixelBuffer::try_new(8, 8, 1).unwrap();
    assert_eq!(p.validate(), Ok(()));
    p.data.pop();
    assert_eq!(p.validate(), Err(TileError::PixelDataIllegalLength));
  }

  #[test]
  fn test_tile_access() {
    let p = sheet_16x16_ya8();
    assert_eq!(p.index_at(15, 15), Some(0));
    assert_eq!(p.index_at(8, 8), Some(9));
    assert_eq!(p.index_at(16, 0), None);
    assert_eq!(p.is_authoritative(0, 0), Some(true));
    assert_eq!(p.is_authoritative(9, 9), Some(false));
    assert!(!p.tile_is_transparent(0, 1));
    assert!(p.tile_is_transparent(1, 1));
    assert!(!p.tile_is_transparent(2, 1));
    let mut out = [0; 64];
    p.read_tile(1, 1, &mut out);
    assert_eq!(out[0], 9);
    assert_eq!(p.as_ya8().map(|px| px[0]), Some(YA8::opaque(3)));
  }

  #[test]
  fn test_one_opaque_pixel_keeps_tile() {
    let mut p = sheet_16x16_ya8();
    // make one pixel of the blank tile opaque
    let i = xy_width_to_index(15, 15, 16) * 2;
    p.data[i + 1] = YA8::OPAQUE;
    assert!(!p.tile_is_transparent(1, 1));
  }

  #[test]
  fn test_to_rgba() {
    let p = sheet_16x16_ya8();
    let palette = [RGB8::new(1, 2, 3), RGB8::new(4, 5, 6)];
    let rgba = p.to_rgba(&palette).unwrap();
    assert_eq!(rgba.len(), 256);
    // index 3 is past the palette end
    let first = rgba[0];
    assert_eq!((first.r, first.g, first.b, first.a), (0, 0, 0, 0xFF));
    let last = rgba[255];
    assert_eq!((last.r, last.g, last.b, last.a), (1, 2, 3, 0));
  }

  #[test]
  fn test_gray_preview() {
    let mut p = PixelBuffer::try_new(8, 8, 1).unwrap();
    p.data[..3].copy_from_slice(&[0, 1, 2]);
    let nes = TileFormat::Nes1bpp.descriptor();
    assert_eq!(&p.to_gray_preview(nes).unwrap()[..3], &[0x00, 0xFF, 0x00]);
    let gb = TileFormat::SnesGb2bpp.descriptor();
    assert_eq!(&p.to_gray_preview(gb).unwrap()[..3], &[0x00, 0x55, 0xAA]);
  }
}

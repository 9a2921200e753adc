#![forbid(unsafe_code)]

//! Bit layouts: where each bit of each pixel lives within a tile's bytes.
//!
//! Every supported format stores 8x8 tiles, and every tile is a fixed number
//! of bytes (`64 * bpp / 8`). The only thing that differs between formats is
//! how the bits of the 64 pixel values are spread across those bytes. There
//! are two families:
//!
//! * **Planar**: each byte holds one bit of eight horizontally adjacent
//!   pixels, with the leftmost pixel in the high bit. A single byte is "one
//!   bitplane of one row". Bitplanes are grouped: the rows of a group are
//!   interleaved (`row 0 plane 0, row 0 plane 1, row 1 plane 0, ...`), and
//!   each group starts `gap` bytes after the previous one.
//! * **Packed**: all bits of a pixel are adjacent. A row is `bpp` bytes, with
//!   `8 / bpp` pixels per byte. Formats differ in whether the leftmost pixel
//!   of a byte is in the high or the low bits, and whether the row is read as
//!   a little-endian word (last byte first).

/// Width and height of a tile, in pixels.
pub const TILE_DIM: u32 = 8;

/// Pixels in a single tile.
pub const TILE_PIXELS: usize = (TILE_DIM * TILE_DIM) as usize;

/// The bytes required to store one tile at the given bit depth.
#[inline]
#[must_use]
pub const fn tile_byte_size(bits_per_pixel: u8) -> usize {
  TILE_PIXELS * (bits_per_pixel as usize) / 8
}

/// How the bits of a tile are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitLayout {
  /// One bitplane of one row per byte.
  Planar {
    /// Bitplanes whose rows are interleaved with each other.
    planes_per_group: u8,
    /// Byte distance from the start of one group to the start of the next.
    gap: u8,
  },
  /// All bits of each pixel adjacent within a byte.
  Packed {
    /// The leftmost pixel of a byte is in the high bits.
    high_pixel_first: bool,
    /// The bytes of a row are read last byte first.
    little_endian_row: bool,
  },
}
impl BitLayout {
  /// Index (within the tile) of the byte holding plane `plane` of row `row`.
  #[inline]
  #[must_use]
  const fn planar_offset(
    planes_per_group: u8, gap: u8, bits_per_pixel: u8, plane: u8, row: usize,
  ) -> usize {
    let group = plane / planes_per_group;
    let slot = plane % planes_per_group;
    let used = bits_per_pixel - group * planes_per_group;
    let in_group = if used < planes_per_group { used } else { planes_per_group };
    (group as usize) * (gap as usize) + row * (in_group as usize) + (slot as usize)
  }

  /// Locates pixel `x` of a packed row: the byte within the row and the bit
  /// shift of the pixel's value in that byte.
  #[inline]
  #[must_use]
  const fn packed_position(
    high_pixel_first: bool, little_endian_row: bool, bits_per_pixel: u8, x: usize,
  ) -> (usize, u32) {
    let bpp = bits_per_pixel as usize;
    let per_byte = 8 / bpp;
    let k = x / per_byte;
    let byte = if little_endian_row { bpp - 1 - k } else { k };
    let slot = x % per_byte;
    let shift = if high_pixel_first { 8 - bpp * (slot + 1) } else { bpp * slot };
    (byte, shift as u32)
  }

  /// Unpacks one tile's bytes into 64 palette indexes, row-major.
  ///
  /// `tile` must be at least [`tile_byte_size`] bytes. Any bytes beyond that
  /// are ignored.
  #[inline]
  pub fn decode_tile(self, bits_per_pixel: u8, tile: &[u8], out: &mut [u8; TILE_PIXELS]) {
    debug_assert!(tile.len() >= tile_byte_size(bits_per_pixel));
    out.fill(0);
    match self {
      Self::Planar { planes_per_group, gap } => {
        for row in 0..TILE_DIM as usize {
          let out_row = &mut out[row * 8..(row + 1) * 8];
          for plane in 0..bits_per_pixel {
            let offset =
              Self::planar_offset(planes_per_group, gap, bits_per_pixel, plane, row);
            let byte = tile[offset];
            for (x, px) in out_row.iter_mut().enumerate() {
              let bit = (byte >> (7 - x)) & 1;
              *px |= bit << plane;
            }
          }
        }
      }
      Self::Packed { high_pixel_first, little_endian_row } => {
        let bpp = bits_per_pixel as usize;
        let mask = ((1_u16 << bits_per_pixel) - 1) as u8;
        for row in 0..TILE_DIM as usize {
          let row_bytes = &tile[row * bpp..(row + 1) * bpp];
          for x in 0..8 {
            let (byte, shift) =
              Self::packed_position(high_pixel_first, little_endian_row, bits_per_pixel, x);
            out[row * 8 + x] = (row_bytes[byte] >> shift) & mask;
          }
        }
      }
    }
  }

  /// Packs 64 palette indexes (row-major) into one tile's bytes.
  ///
  /// Indexes are masked to `bits_per_pixel` bits. `tile` must be exactly
  /// [`tile_byte_size`] bytes and is fully overwritten.
  #[inline]
  pub fn encode_tile(self, bits_per_pixel: u8, pixels: &[u8; TILE_PIXELS], tile: &mut [u8]) {
    debug_assert_eq!(tile.len(), tile_byte_size(bits_per_pixel));
    tile.fill(0);
    let mask = ((1_u16 << bits_per_pixel) - 1) as u8;
    match self {
      Self::Planar { planes_per_group, gap } => {
        for row in 0..TILE_DIM as usize {
          let in_row = &pixels[row * 8..(row + 1) * 8];
          for plane in 0..bits_per_pixel {
            let offset =
              Self::planar_offset(planes_per_group, gap, bits_per_pixel, plane, row);
            let mut byte = 0_u8;
            for (x, px) in in_row.iter().enumerate() {
              let bit = ((px & mask) >> plane) & 1;
              byte |= bit << (7 - x);
            }
            tile[offset] = byte;
          }
        }
      }
      Self::Packed { high_pixel_first, little_endian_row } => {
        let bpp = bits_per_pixel as usize;
        for row in 0..TILE_DIM as usize {
          let row_bytes = &mut tile[row * bpp..(row + 1) * bpp];
          for x in 0..8 {
            let (byte, shift) =
              Self::packed_position(high_pixel_first, little_endian_row, bits_per_pixel, x);
            row_bytes[byte] |= (pixels[row * 8 + x] & mask) << shift;
          }
        }
      }
    }
  }
}

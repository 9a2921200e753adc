#![forbid(unsafe_code)]

//! Built-in palettes.
//!
//! Raw tile data has no colors of its own, so decoded sheets get one of a
//! small set of fixed tables. The table only depends on the color count, never
//! on which indexes an image actually uses.

use crate::{TileError, RGB8};

const fn c(r: u8, g: u8, b: u8) -> RGB8 {
  RGB8::new(r, g, b)
}

/// Black and a light gray.
pub static PALETTE_2: [RGB8; 2] = [c(0x00, 0x00, 0x00), c(0xA0, 0xA0, 0xA0)];

/// The first four entries of [`PALETTE_16`].
pub static PALETTE_4: [RGB8; 4] = first_n(&PALETTE_16_BASE);

/// The first eight entries of [`PALETTE_16`].
pub static PALETTE_8: [RGB8; 8] = first_n(&PALETTE_16_BASE);

/// The full 16 color table.
pub static PALETTE_16: [RGB8; 16] = PALETTE_16_BASE;

/// [`PALETTE_16`] repeated sixteen times.
pub static PALETTE_256: [RGB8; 256] = repeat_16(&PALETTE_16_BASE);

const PALETTE_16_BASE: [RGB8; 16] = [
  c(0x00, 0x00, 0x00),
  c(0x8C, 0x63, 0x21),
  c(0xAD, 0xB5, 0x31),
  c(0xC6, 0xE7, 0x9C),
  //
  c(0xF8, 0xF8, 0x00),
  c(0xF8, 0xC0, 0x00),
  c(0xF8, 0x78, 0x00),
  c(0xF8, 0x00, 0x00),
  //
  c(0xFA, 0xD3, 0x5A),
  c(0x29, 0xA2, 0x29),
  c(0x00, 0x78, 0x48),
  c(0x00, 0x38, 0x39),
  //
  c(0xD8, 0xF0, 0xF8),
  c(0xA8, 0xC0, 0xC8),
  c(0x90, 0xA8, 0xB0),
  c(0x60, 0x78, 0x90),
];

const fn first_n<const N: usize>(base: &[RGB8; 16]) -> [RGB8; N] {
  let mut out = [c(0, 0, 0); N];
  let mut i = 0;
  while i < N {
    out[i] = base[i];
    i += 1;
  }
  out
}

const fn repeat_16(base: &[RGB8; 16]) -> [RGB8; 256] {
  let mut out = [c(0, 0, 0); 256];
  let mut i = 0;
  while i < 256 {
    out[i] = base[i % 16];
    i += 1;
  }
  out
}

/// Gets the built-in palette with exactly `count` colors.
///
/// ## Failure
/// * [`TileError::UnsupportedPaletteSize`] unless `count` is 2, 4, 8, 16, or
///   256.
#[inline]
pub fn builtin_palette(count: u16) -> Result<&'static [RGB8], TileError> {
  Ok(match count {
    2 => &PALETTE_2,
    4 => &PALETTE_4,
    8 => &PALETTE_8,
    16 => &PALETTE_16,
    256 => &PALETTE_256,
    _ => return Err(TileError::UnsupportedPaletteSize),
  })
}

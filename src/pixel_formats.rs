#![forbid(unsafe_code)]

//! Module for the pixel formats that tile sheets are built from.
//!
//! Tile graphics never store color directly. Every pixel is a palette index,
//! so a decoded sheet is one byte per pixel. When a sheet has padding tiles
//! (or surplus bytes to carry around) each index is paired with an alpha byte
//! that says whether the pixel came from real source data. That pair is
//! [`YA8`]: the "Y" channel holds the index rather than a gray level.
//!
//! Palette entries are [`RGB8`].

use bytemuck::{Pod, Zeroable};

/// An 8-bit per channel RGB color, as stored in a palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Zeroable, Pod)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGB8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}
impl RGB8 {
  /// Makes a color from its three channels.
  #[inline]
  #[must_use]
  pub const fn new(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b }
  }
}
impl From<[u8; 3]> for RGB8 {
  #[inline]
  fn from([r, g, b]: [u8; 3]) -> Self {
    Self { r, g, b }
  }
}

/// A palette index plus an alpha byte.
///
/// The alpha is either [`YA8::OPAQUE`] (the index came from source bytes) or
/// [`YA8::TRANSPARENT`] (the pixel is padding).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Zeroable, Pod)]
#[repr(C)]
#[allow(missing_docs)]
pub struct YA8 {
  pub y: u8,
  pub a: u8,
}
impl YA8 {
  /// Alpha of a pixel backed by source data.
  pub const OPAQUE: u8 = 0xFF;
  /// Alpha of a padding pixel.
  pub const TRANSPARENT: u8 = 0x00;

  /// A padding pixel: index 0, fully transparent.
  pub const PADDING: Self = Self { y: 0, a: Self::TRANSPARENT };

  /// An authoritative pixel with the given index.
  #[inline]
  #[must_use]
  pub const fn opaque(index: u8) -> Self {
    Self { y: index, a: Self::OPAQUE }
  }
}

#[test]
fn test_ya8_cast_order() {
  let px = [YA8::opaque(3), YA8::PADDING];
  let bytes: &[u8] = bytemuck::cast_slice(&px);
  assert_eq!(bytes, &[3, 0xFF, 0, 0]);
}

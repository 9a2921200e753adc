use core::{
  fmt,
  num::{ParseIntError, TryFromIntError},
  str::Utf8Error,
};

/// An error from the `tilebin` crate.
///
/// None of these are retried internally. Most of them mean the format tag and
/// the data don't agree with each other, so "try a different format" is
/// usually the fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum TileError {
  /// The format tag isn't one of the closed set of supported formats.
  UnknownFormat,

  /// The data is too short to hold even a single complete tile.
  ZeroTileCount,

  /// The allocator couldn't give us enough space.
  AllocationFailed,

  /// Encoding needs 1 (index) or 2 (index + alpha) bytes per pixel.
  UnsupportedPixelDepth,

  /// There's no built-in palette with that many colors.
  UnsupportedPaletteSize,

  /// The width or height would not fit in a `u32`.
  DimensionsTooLarge,

  /// Width and height must both be non-zero multiples of the tile size.
  DimensionsNotTileAligned,

  /// The pixel data length doesn't match `width * height * bytes_per_pixel`.
  PixelDataIllegalLength,

  /// A row width override must be a non-zero multiple of the tile width.
  InvalidRowWidth,

  /// A format descriptor's bit layout doesn't fit inside its tiles.
  InvalidLayout,

  /// Failed to parse the data given.
  Parse,
}
impl fmt::Display for TileError {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::UnknownFormat => "unknown format",
      Self::ZeroTileCount => "not enough data for a single tile",
      Self::AllocationFailed => "allocation failed",
      Self::UnsupportedPixelDepth => "pixel buffer must have 1 or 2 bytes per pixel",
      Self::UnsupportedPaletteSize => "no built-in palette for that color count",
      Self::DimensionsTooLarge => "image dimensions too large",
      Self::DimensionsNotTileAligned => "image dimensions are not whole tiles",
      Self::PixelDataIllegalLength => "pixel data length doesn't match the dimensions",
      Self::InvalidRowWidth => "row width must be a non-zero multiple of 8",
      Self::InvalidLayout => "bit layout doesn't fit the tile size",
      Self::Parse => "parse error",
    };
    f.write_str(s)
  }
}
#[cfg(feature = "alloc")]
impl From<alloc::collections::TryReserveError> for TileError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::AllocationFailed
  }
}
impl From<Utf8Error> for TileError {
  #[inline]
  fn from(_: Utf8Error) -> Self {
    Self::Parse
  }
}
impl From<ParseIntError> for TileError {
  #[inline]
  fn from(_: ParseIntError) -> Self {
    Self::Parse
  }
}
impl From<TryFromIntError> for TileError {
  #[inline]
  fn from(_: TryFromIntError) -> Self {
    Self::DimensionsTooLarge
  }
}

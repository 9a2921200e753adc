#![forbid(unsafe_code)]

//! The closed set of supported tile formats, and their constants.

use core::{fmt, str::FromStr};

use crate::{tile_byte_size, BitLayout, TileError, TILE_DIM};

/// A supported raw tile format.
///
/// The discriminant is the format's numeric tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TileFormat {
  /// NES-style 1bpp: one bitplane.
  Nes1bpp = 0,
  /// NES 2bpp: plane 0 for all 8 rows, then plane 1 for all 8 rows.
  Nes2bpp = 1,
  /// SNES / Game Boy 2bpp: both planes interleaved per row.
  SnesGb2bpp = 2,
  /// Neo Geo Pocket Color 2bpp: packed, each row a little-endian `u16`.
  Ngpc2bpp = 3,
  /// SNES 3bpp: an interleaved plane pair, then the third plane.
  Snes3bpp = 4,
  /// GBA 4bpp: packed nibbles, leftmost pixel in the low nibble.
  Gba4bpp = 5,
  /// SNES / PC Engine 4bpp: two interleaved plane pairs.
  Snes4bpp = 6,
  /// Game Gear / Master System / WonderSwan Color 4bpp: all four planes
  /// interleaved per row.
  GgSmsWsc4bpp = 7,
  /// Genesis 4bpp: packed nibbles, leftmost pixel in the high nibble.
  Gen4bpp = 8,
  /// GBA 8bpp: one pixel per byte.
  Gba8bpp = 9,
  /// SNES 8bpp: four interleaved plane pairs.
  Snes8bpp = 10,
}

/// Constants describing one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatDescriptor {
  /// Human readable name.
  pub name: &'static str,
  /// Short lowercase name, used on the command line and in file metadata.
  pub slug: &'static str,
  /// Bits per pixel, `1..=8`.
  pub bits_per_pixel: u8,
  /// The row width (in pixels) that a sheet wraps at when decoded.
  pub default_width: u32,
  /// Colors in the format's palette.
  pub num_colors: u16,
  /// Where the bits go.
  pub layout: BitLayout,
}
impl FormatDescriptor {
  /// Tile width, the same for every format.
  pub const TILE_WIDTH: u32 = TILE_DIM;
  /// Tile height, the same for every format.
  pub const TILE_HEIGHT: u32 = TILE_DIM;
  /// Every built-in palette entry is three bytes.
  pub const PALETTE_BYTES_PER_ENTRY: usize = 3;

  /// Bytes per tile.
  #[inline]
  #[must_use]
  pub const fn tile_byte_size(&self) -> usize {
    tile_byte_size(self.bits_per_pixel)
  }

  /// Gives a copy of this descriptor with a different row width.
  ///
  /// ## Failure
  /// * The width must be a non-zero multiple of the tile width.
  #[inline]
  pub const fn with_default_width(self, default_width: u32) -> Result<Self, TileError> {
    if default_width == 0 || default_width % Self::TILE_WIDTH != 0 {
      return Err(TileError::InvalidRowWidth);
    }
    Ok(Self { default_width, ..self })
  }

  /// Checks that the constants describe a layout the codecs can run.
  ///
  /// Every built-in descriptor passes. Hand-built ones might not.
  ///
  /// ## Failure
  /// * [`TileError::InvalidRowWidth`] unless the default width is a non-zero
  ///   multiple of the tile width.
  /// * [`TileError::InvalidLayout`] if the bit depth isn't `1..=8`, a packed
  ///   layout's depth doesn't divide a byte evenly, or a planar layout's
  ///   groups overlap or run past the end of the tile.
  #[inline]
  pub const fn validate(&self) -> Result<(), TileError> {
    if self.default_width == 0 || self.default_width % Self::TILE_WIDTH != 0 {
      return Err(TileError::InvalidRowWidth);
    }
    let bpp = self.bits_per_pixel;
    if bpp == 0 || bpp > 8 {
      return Err(TileError::InvalidLayout);
    }
    match self.layout {
      BitLayout::Packed { .. } => {
        if 8 % bpp != 0 {
          return Err(TileError::InvalidLayout);
        }
      }
      BitLayout::Planar { planes_per_group, gap } => {
        if planes_per_group == 0 {
          return Err(TileError::InvalidLayout);
        }
        let rows = TILE_DIM as usize;
        let last_group = (bpp - 1) / planes_per_group;
        if last_group > 0 && (gap as usize) < rows * (planes_per_group as usize) {
          return Err(TileError::InvalidLayout);
        }
        let in_last = (bpp - last_group * planes_per_group) as usize;
        let end = (last_group as usize) * (gap as usize) + rows * in_last;
        if end > self.tile_byte_size() {
          return Err(TileError::InvalidLayout);
        }
      }
    }
    Ok(())
  }
}

const PLANES_1: BitLayout = BitLayout::Planar { planes_per_group: 1, gap: 8 };
const PLANE_PAIRS: BitLayout = BitLayout::Planar { planes_per_group: 2, gap: 16 };
const PLANE_QUADS: BitLayout = BitLayout::Planar { planes_per_group: 4, gap: 32 };

const DESCRIPTORS: [FormatDescriptor; 11] = [
  FormatDescriptor {
    name: "1bpp NES",
    slug: "nes-1bpp",
    bits_per_pixel: 1,
    default_width: 128,
    num_colors: 2,
    layout: PLANES_1,
  },
  FormatDescriptor {
    name: "2bpp NES",
    slug: "nes-2bpp",
    bits_per_pixel: 2,
    default_width: 128,
    num_colors: 4,
    layout: PLANES_1,
  },
  FormatDescriptor {
    name: "2bpp SNES/GB",
    slug: "snesgb-2bpp",
    bits_per_pixel: 2,
    default_width: 128,
    num_colors: 4,
    layout: PLANE_PAIRS,
  },
  FormatDescriptor {
    name: "2bpp NGPC",
    slug: "ngpc-2bpp",
    bits_per_pixel: 2,
    default_width: 128,
    num_colors: 4,
    layout: BitLayout::Packed { high_pixel_first: true, little_endian_row: true },
  },
  FormatDescriptor {
    name: "3bpp SNES",
    slug: "snes-3bpp",
    bits_per_pixel: 3,
    default_width: 128,
    num_colors: 8,
    layout: PLANE_PAIRS,
  },
  FormatDescriptor {
    name: "4bpp GBA",
    slug: "gba-4bpp",
    bits_per_pixel: 4,
    default_width: 128,
    num_colors: 16,
    layout: BitLayout::Packed { high_pixel_first: false, little_endian_row: false },
  },
  FormatDescriptor {
    name: "4bpp SNES/PCE",
    slug: "snes-4bpp",
    bits_per_pixel: 4,
    default_width: 128,
    num_colors: 16,
    layout: PLANE_PAIRS,
  },
  FormatDescriptor {
    name: "4bpp GG/SMS/WSC",
    slug: "ggsmswsc-4bpp",
    bits_per_pixel: 4,
    default_width: 128,
    num_colors: 16,
    layout: PLANE_QUADS,
  },
  FormatDescriptor {
    name: "4bpp GEN",
    slug: "gen-4bpp",
    bits_per_pixel: 4,
    default_width: 128,
    num_colors: 16,
    layout: BitLayout::Packed { high_pixel_first: true, little_endian_row: false },
  },
  FormatDescriptor {
    name: "8bpp GBA",
    slug: "gba-8bpp",
    bits_per_pixel: 8,
    default_width: 256,
    num_colors: 256,
    layout: BitLayout::Packed { high_pixel_first: true, little_endian_row: false },
  },
  FormatDescriptor {
    name: "8bpp SNES",
    slug: "snes-8bpp",
    bits_per_pixel: 8,
    default_width: 128,
    num_colors: 256,
    layout: PLANE_PAIRS,
  },
];

impl TileFormat {
  /// Every format, in tag order.
  pub const ALL: [Self; 11] = [
    Self::Nes1bpp,
    Self::Nes2bpp,
    Self::SnesGb2bpp,
    Self::Ngpc2bpp,
    Self::Snes3bpp,
    Self::Gba4bpp,
    Self::Snes4bpp,
    Self::GgSmsWsc4bpp,
    Self::Gen4bpp,
    Self::Gba8bpp,
    Self::Snes8bpp,
  ];

  /// The numeric tag.
  #[inline]
  #[must_use]
  pub const fn tag(self) -> u8 {
    self as u8
  }

  /// The format's constants.
  #[inline]
  #[must_use]
  pub const fn descriptor(self) -> &'static FormatDescriptor {
    &DESCRIPTORS[self as usize]
  }

  /// Shorthand for `self.descriptor().slug`.
  #[inline]
  #[must_use]
  pub const fn slug(self) -> &'static str {
    self.descriptor().slug
  }

  /// Looks up a format by tag.
  #[inline]
  pub const fn from_tag(tag: u8) -> Result<Self, TileError> {
    if (tag as usize) < Self::ALL.len() {
      Ok(Self::ALL[tag as usize])
    } else {
      Err(TileError::UnknownFormat)
    }
  }
}
impl Default for TileFormat {
  /// SNES 4bpp, the format used when nothing else picks one.
  #[inline]
  fn default() -> Self {
    Self::Snes4bpp
  }
}
impl TileFormat {
  /// Guesses a format from a file extension (without the dot).
  ///
  /// Only extensions that are tied to one platform's tile layout are known:
  /// `chr` and `nes` are NES 2bpp, `gb` is SNES/GB 2bpp. Case is ignored.
  #[inline]
  #[must_use]
  pub fn from_extension(ext: &str) -> Option<Self> {
    if ext.eq_ignore_ascii_case("chr") || ext.eq_ignore_ascii_case("nes") {
      Some(Self::Nes2bpp)
    } else if ext.eq_ignore_ascii_case("gb") {
      Some(Self::SnesGb2bpp)
    } else {
      None
    }
  }
}
impl TryFrom<u8> for TileFormat {
  type Error = TileError;
  #[inline]
  fn try_from(tag: u8) -> Result<Self, Self::Error> {
    Self::from_tag(tag)
  }
}
impl FromStr for TileFormat {
  type Err = TileError;
  /// Accepts the numeric tag, the slug, or the display name. Names are
  /// matched without regard to ASCII case.
  #[inline]
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if let Ok(tag) = s.parse::<u8>() {
      return Self::from_tag(tag);
    }
    Self::ALL
      .iter()
      .copied()
      .find(|f| {
        let d = f.descriptor();
        d.slug.eq_ignore_ascii_case(s) || d.name.eq_ignore_ascii_case(s)
      })
      .ok_or(TileError::UnknownFormat)
  }
}
impl fmt::Display for TileFormat {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.descriptor().name)
  }
}

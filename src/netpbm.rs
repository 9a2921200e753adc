#![forbid(unsafe_code)]

//! Netpbm interchange for decoded sheets.
//!
//! A decoded sheet is saved as a [Netpbm](https://en.wikipedia.org/wiki/Netpbm)
//! file so that any ordinary image editor can work on it:
//! * Sheets without alpha become `P5` (binary grayscale, maxval 255). Each
//!   gray value *is* the palette index, so the file looks very dark when
//!   viewed directly. That's expected, use a preview for viewing.
//! * Sheets with alpha become `P7` (PAM) with `TUPLTYPE GRAYSCALE_ALPHA`.
//!
//! The format used and any surplus bytes are stored in header comments:
//! ```text
//! # tilebin-format snes-4bpp
//! # tilebin-surplus 0a1b2c
//! ```
//! Since comments survive a round trip through most tools, this is enough to
//! put the file back together exactly.
//!
//! Previews are separate, write-only, files: `P6` color through the palette,
//! or `P5` gray with each index stretched over the full range.

use core::str::from_utf8;

use alloc::{format, string::String, vec::Vec};

use crate::{FormatDescriptor, PixelBuffer, TileError, TileFormat, TileSheet, RGB8};

const FORMAT_KEY: &str = "tilebin-format";
const SURPLUS_KEY: &str = "tilebin-surplus";

/// Metadata gathered from the header comments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileComments<'b> {
  /// Value of the `tilebin-format` comment.
  pub format: Option<&'b str>,
  /// Value of the `tilebin-surplus` comment, still hex encoded.
  pub surplus_hex: Option<&'b str>,
}
impl<'b> TileComments<'b> {
  #[inline]
  fn note(&mut self, line: &'b [u8]) {
    let Ok(line) = from_utf8(line) else { return };
    let line = line.trim();
    if let Some(v) = line.strip_prefix(FORMAT_KEY) {
      self.format = Some(v.trim());
    } else if let Some(v) = line.strip_prefix(SURPLUS_KEY) {
      self.surplus_hex = Some(v.trim());
    }
  }
}

/// The header fields that matter for a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetpbmHeader {
  /// 5 for `P5`, 7 for `P7`.
  pub tag: u8,
  /// Pixels per row.
  pub width: u32,
  /// Pixel rows.
  pub height: u32,
  /// Samples per pixel: always 1 for `P5`, 1 or 2 for `P7`.
  pub depth: u32,
  /// Max value per sample.
  pub max: u32,
}

/// Skips whitespace and comments, noting any comments we recognize.
#[inline]
pub fn netpbm_trim<'b>(mut bytes: &'b [u8], comments: &mut TileComments<'b>) -> &'b [u8] {
  loop {
    match bytes {
      // trim leading whitespace
      [u, tail @ ..] if u.is_ascii_whitespace() => bytes = tail,

      // single-line comment
      [b'#', tail @ ..] => {
        let mut it = tail.splitn(2, |&u| u == b'\n');
        if let Some(line) = it.next() {
          comments.note(line);
        }
        bytes = it.next().unwrap_or(&[]);
      }

      // now we're done
      _ => return bytes,
    }
  }
}

/// Reads the `P<n>` magic, giving back `n`.
#[inline]
pub fn netpbm_pull_tag(bytes: &[u8]) -> Result<(u8, &[u8]), TileError> {
  match bytes {
    [b'P', tag, rest @ ..] => Ok((tag.wrapping_sub(b'0'), rest)),
    _ => Err(TileError::Parse),
  }
}

/// Reads a decimal number and the single delimiter byte after it.
///
/// Nothing after the delimiter is touched, because after the last header
/// field of a `P5` the binary data starts immediately.
#[inline]
pub fn netpbm_pull_ascii_u32(bytes: &[u8]) -> Result<(u32, &[u8]), TileError> {
  let mut it = bytes.splitn(2, |u| !u.is_ascii_digit());
  let digits = it.next().ok_or(TileError::Parse)?;
  let spare = it.next().ok_or(TileError::Parse)?;
  let number = from_utf8(digits)?.parse::<u32>()?;
  Ok((number, spare))
}

/// Reads the header of a `P5` or `P7` file.
///
/// Returns the header, the comment metadata, and the bytes after the header.
pub fn netpbm_pull_header(
  bytes: &[u8],
) -> Result<(NetpbmHeader, TileComments<'_>, &[u8]), TileError> {
  let mut comments = TileComments::default();
  let (tag, rest) = netpbm_pull_tag(bytes)?;
  match tag {
    5 => {
      let (width, rest) = netpbm_pull_ascii_u32(netpbm_trim(rest, &mut comments))?;
      let (height, rest) = netpbm_pull_ascii_u32(netpbm_trim(rest, &mut comments))?;
      let (max, rest) = netpbm_pull_ascii_u32(netpbm_trim(rest, &mut comments))?;
      Ok((NetpbmHeader { tag, width, height, depth: 1, max }, comments, rest))
    }
    7 => {
      let mut rest = rest;
      let (mut width, mut height, mut depth, mut max) = (None, None, None, None);
      let mut tupltype = None;
      loop {
        rest = netpbm_trim(rest, &mut comments);
        if rest.is_empty() {
          return Err(TileError::Parse);
        }
        let mut it = rest.splitn(2, |&u| u == b'\n');
        let line = from_utf8(it.next().unwrap_or(&[]))?;
        rest = it.next().unwrap_or(&[]);
        let mut words = line.split_ascii_whitespace();
        match (words.next(), words.next()) {
          (Some("ENDHDR"), None) => break,
          (Some("WIDTH"), Some(v)) => width = Some(v.parse::<u32>()?),
          (Some("HEIGHT"), Some(v)) => height = Some(v.parse::<u32>()?),
          (Some("DEPTH"), Some(v)) => depth = Some(v.parse::<u32>()?),
          (Some("MAXVAL"), Some(v)) => max = Some(v.parse::<u32>()?),
          (Some("TUPLTYPE"), Some(v)) => tupltype = Some(v),
          _ => return Err(TileError::Parse),
        }
      }
      let depth = depth.ok_or(TileError::Parse)?;
      match (tupltype, depth) {
        (None, _) | (Some("GRAYSCALE"), 1) | (Some("GRAYSCALE_ALPHA"), 2) => (),
        _ => return Err(TileError::Parse),
      }
      let header = NetpbmHeader {
        tag,
        width: width.ok_or(TileError::Parse)?,
        height: height.ok_or(TileError::Parse)?,
        depth,
        max: max.ok_or(TileError::Parse)?,
      };
      Ok((header, comments, rest))
    }
    _ => Err(TileError::Parse),
  }
}

/// A sheet read back from a Netpbm file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NetpbmSheet {
  /// The pixel indexes (and alpha, if the file had it).
  pub pixels: PixelBuffer,
  /// The format named in the file's comments, if any.
  pub format: Option<TileFormat>,
  /// Surplus bytes from the file's comments, if any.
  pub surplus: Option<Vec<u8>>,
}

/// Reads a `P5` or `P7` file written by [`netpbm_write_sheet`] (or by any
/// tool that kept the same shape).
///
/// ## Failure
/// * [`TileError::Parse`] if the header is malformed, the file isn't 8-bit
///   gray (plus optional alpha), or the pixel data is cut short.
/// * [`TileError::UnknownFormat`] if the format comment names no known
///   format.
/// * The pixel buffer's own checks, such as non tile aligned sizes.
pub fn netpbm_read_sheet(bytes: &[u8]) -> Result<NetpbmSheet, TileError> {
  let (header, comments, rest) = netpbm_pull_header(bytes)?;
  if !(1..=255).contains(&header.max) || !(1..=2).contains(&header.depth) {
    return Err(TileError::Parse);
  }
  let format = comments.format.map(str::parse::<TileFormat>).transpose()?;
  let surplus = comments.surplus_hex.map(hex_decode).transpose()?;

  let depth = header.depth as u8;
  let len = PixelBuffer::byte_len_for(header.width, header.height, depth)?;
  // the header's size claim is checked against the real data before allocating
  let src = rest.get(..len).ok_or(TileError::Parse)?;
  let mut data = Vec::new();
  data.try_reserve(len)?;
  data.extend_from_slice(src);
  let pixels = PixelBuffer { width: header.width, height: header.height, bytes_per_pixel: depth, data };
  Ok(NetpbmSheet { pixels, format, surplus })
}

/// Writes a sheet as `P5` or `P7`, depending on if it has an alpha channel.
pub fn netpbm_write_sheet(sheet: &TileSheet, format: TileFormat) -> Result<Vec<u8>, TileError> {
  let pixels = &sheet.pixels;
  pixels.validate()?;
  let mut comments = format!("# {FORMAT_KEY} {}\n", format.slug());
  if let Some(surplus) = sheet.surplus.as_deref().filter(|s| !s.is_empty()) {
    comments.push_str("# ");
    comments.push_str(SURPLUS_KEY);
    comments.push(' ');
    hex_encode(surplus, &mut comments)?;
    comments.push('\n');
  }
  let header = if pixels.has_alpha() {
    format!(
      "P7\n{comments}WIDTH {}\nHEIGHT {}\nDEPTH 2\nMAXVAL 255\nTUPLTYPE GRAYSCALE_ALPHA\nENDHDR\n",
      pixels.width, pixels.height
    )
  } else {
    format!("P5\n{comments}{} {}\n255\n", pixels.width, pixels.height)
  };
  with_header(&header, &pixels.data)
}

/// Writes a `P6` color preview, looking each index up in the palette.
///
/// Transparent pixels use the palette's first color.
pub fn netpbm_write_preview_rgb(pixels: &PixelBuffer, palette: &[RGB8]) -> Result<Vec<u8>, TileError> {
  let background = palette.first().copied().unwrap_or_default();
  let rgba = pixels.to_rgba(palette)?;
  let mut rgb: Vec<RGB8> = Vec::new();
  rgb.try_reserve(rgba.len())?;
  rgb.extend(rgba.iter().map(|p| {
    if p.a == 0 {
      background
    } else {
      RGB8::new(p.r, p.g, p.b)
    }
  }));
  let header = format!("P6\n{} {}\n255\n", pixels.width, pixels.height);
  with_header(&header, bytemuck::cast_slice(&rgb))
}

/// Writes a `P5` gray preview, see [`PixelBuffer::to_gray_preview`].
pub fn netpbm_write_preview_gray(
  pixels: &PixelBuffer, format: &FormatDescriptor,
) -> Result<Vec<u8>, TileError> {
  let gray = pixels.to_gray_preview(format)?;
  let header = format!("P5\n{} {}\n255\n", pixels.width, pixels.height);
  with_header(&header, &gray)
}

fn with_header(header: &str, data: &[u8]) -> Result<Vec<u8>, TileError> {
  let mut out = Vec::new();
  out.try_reserve(header.len() + data.len())?;
  out.extend_from_slice(header.as_bytes());
  out.extend_from_slice(data);
  Ok(out)
}

fn hex_encode(bytes: &[u8], out: &mut String) -> Result<(), TileError> {
  const DIGITS: &[u8; 16] = b"0123456789abcdef";
  out.try_reserve(bytes.len() * 2)?;
  for b in bytes {
    out.push(char::from(DIGITS[usize::from(b >> 4)]));
    out.push(char::from(DIGITS[usize::from(b & 0xF)]));
  }
  Ok(())
}

fn hex_decode(hex: &str) -> Result<Vec<u8>, TileError> {
  if hex.len() % 2 != 0 {
    return Err(TileError::Parse);
  }
  let mut out = Vec::new();
  out.try_reserve(hex.len() / 2)?;
  for pair in hex.as_bytes().chunks_exact(2) {
    out.push(u8::from_str_radix(from_utf8(pair)?, 16)?);
  }
  Ok(out)
}

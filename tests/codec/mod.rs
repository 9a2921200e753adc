use tilebin::*;

#[test]
fn test_round_trip_whole_tiles() {
  for format in TileFormat::ALL {
    let tile_bytes = format.descriptor().tile_byte_size();
    for tiles in [1, 2, 15, 16, 17, 40] {
      let blob = super::rand_bytes(tile_bytes * tiles);
      let sheet = decode(&blob, format).unwrap();
      assert_eq!(sheet.surplus, None);
      let out = encode(&sheet.pixels, sheet.surplus.as_deref(), format).unwrap();
      assert_eq!(out, blob, "{format} with {tiles} tiles");
    }
  }
}

#[test]
fn test_round_trip_keeps_surplus() {
  for format in TileFormat::ALL {
    let tile_bytes = format.descriptor().tile_byte_size();
    for extra in [1, tile_bytes / 2, tile_bytes - 1] {
      let blob = super::rand_bytes(tile_bytes * 19 + extra);
      let sheet = decode(&blob, format).unwrap();
      assert_eq!(sheet.surplus.as_deref(), Some(&blob[blob.len() - extra..]));
      assert_eq!(sheet.encode(format).unwrap(), blob, "{format} with {extra} extra bytes");
    }
  }
}

#[test]
fn test_pixels_below_color_count() {
  for format in TileFormat::ALL {
    let d = format.descriptor();
    let blob = super::rand_bytes(d.tile_byte_size() * 21 + 3);
    let sheet = decode(&blob, format).unwrap();
    assert_eq!(sheet.palette.len(), usize::from(d.num_colors));
    let step = usize::from(sheet.pixels.bytes_per_pixel);
    for index in sheet.pixels.data.iter().step_by(step) {
      assert!(u16::from(*index) < d.num_colors, "{format}: index {index}");
    }
  }
}

#[test]
fn test_nes_1bpp_stripes_scenario() {
  let blob = [0b1010_1010_u8; 8];
  let sheet = decode(&blob, TileFormat::Nes1bpp).unwrap();
  for y in 0..8 {
    let row: Vec<u8> = (0..8).map(|x| sheet.pixels.index_at(x, y).unwrap()).collect();
    assert_eq!(row, [1, 0, 1, 0, 1, 0, 1, 0]);
  }
  assert_eq!(sheet.palette, [RGB8::new(0, 0, 0), RGB8::new(160, 160, 160)]);
  assert_eq!(encode(&sheet.pixels, None, TileFormat::Nes1bpp).unwrap(), blob);
}

#[test]
fn test_undersized_blob() {
  assert_eq!(decode(&[0; 3], TileFormat::Nes1bpp), Err(TileError::ZeroTileCount));
  assert_eq!(decode(&[], TileFormat::Snes8bpp), Err(TileError::ZeroTileCount));
}

#[test]
fn test_elision_scenario() {
  // 3 tiles of data, 4 slots when wrapped at 16 pixels.
  let format = TileFormat::Gen4bpp;
  let narrow = format.descriptor().with_default_width(16).unwrap();
  let blob = super::rand_bytes(32 * 3);
  let sheet = decode_with(&blob, &narrow).unwrap();
  assert_eq!((sheet.pixels.width, sheet.pixels.height), (16, 16));
  assert!(sheet.pixels.tile_is_transparent(1, 1));
  let out = sheet.encode(format).unwrap();
  let full = (16 * 16 * 4) / 8;
  assert_eq!(out.len(), full - 32);
  assert_eq!(out, blob);
}

#[test]
fn test_padding_is_never_written() {
  // 31 tiles in a 16-wide sheet: one padding tile at the end.
  let blob = super::rand_bytes(8 * 31 + 2);
  let mut sheet = decode(&blob, TileFormat::Nes1bpp).unwrap();
  assert_eq!((sheet.pixels.width, sheet.pixels.height), (128, 16));
  assert_eq!(sheet.pixels.is_authoritative(127, 15), Some(false));
  // editing an opaque pixel changes exactly one bit, the length holds
  let old = sheet.pixels.index_at(0, 0).unwrap();
  sheet.pixels.set_index(0, 0, old ^ 1).unwrap();
  let out = sheet.encode(TileFormat::Nes1bpp).unwrap();
  assert_eq!(out.len(), blob.len());
  assert_eq!(out[0] ^ blob[0], 0b1000_0000);
  assert_eq!(&out[1..], &blob[1..]);
}

#[test]
fn test_encode_without_alpha_writes_every_tile() {
  let pixels = PixelBuffer { width: 16, height: 8, bytes_per_pixel: 1, data: vec![2; 128] };
  let out = encode(&pixels, None, TileFormat::SnesGb2bpp).unwrap();
  assert_eq!(out.len(), 32);
  // plane 0 clear, plane 1 set, rows interleaved
  assert!(out.chunks_exact(2).all(|pair| pair == [0x00, 0xFF]));
}

#[test]
fn test_encode_masks_out_of_range_indexes() {
  let pixels = PixelBuffer { width: 8, height: 8, bytes_per_pixel: 1, data: vec![0x1F; 64] };
  let out = encode(&pixels, None, TileFormat::Gba4bpp).unwrap();
  assert_eq!(out, [0xFF; 32]);
}

#[test]
fn test_formats_disagree_on_the_same_bytes() {
  let blob = super::rand_bytes(64);
  let gen = decode(&blob, TileFormat::Gen4bpp).unwrap();
  let gba = decode(&blob, TileFormat::Gba4bpp).unwrap();
  for y in 0..8 {
    for x in (0..8).step_by(2) {
      assert_eq!(gen.pixels.index_at(x, y), gba.pixels.index_at(x + 1, y));
    }
  }
}

/// One set bit per case: `(format, byte, value, x, y, index)`.
const SINGLE_BIT_TILES: &[(TileFormat, usize, u8, u32, u32, u8)] = &[
  (TileFormat::Nes1bpp, 3, 0x80, 0, 3, 1),
  (TileFormat::Nes2bpp, 10, 0x01, 7, 2, 2),
  (TileFormat::SnesGb2bpp, 5, 0x40, 1, 2, 2),
  (TileFormat::Ngpc2bpp, 2, 0x40, 4, 1, 1),
  (TileFormat::Snes3bpp, 19, 0x80, 0, 3, 4),
  (TileFormat::Gba4bpp, 5, 0x0F, 2, 1, 15),
  (TileFormat::Snes4bpp, 16, 0x80, 0, 0, 4),
  (TileFormat::Snes4bpp, 17, 0x01, 7, 0, 8),
  (TileFormat::GgSmsWsc4bpp, 11, 0x80, 0, 2, 8),
  (TileFormat::Gen4bpp, 1, 0xF0, 2, 0, 15),
  (TileFormat::Gba8bpp, 9, 0x5A, 1, 1, 0x5A),
  (TileFormat::Snes8bpp, 49, 0x80, 0, 0, 0x80),
  (TileFormat::Snes8bpp, 34, 0x01, 7, 1, 0x10),
];

#[test]
fn test_single_bit_lands_on_one_pixel() {
  for &(format, byte, value, x, y, index) in SINGLE_BIT_TILES {
    let mut blob = vec![0_u8; format.descriptor().tile_byte_size()];
    blob[byte] = value;
    let sheet = decode(&blob, format).unwrap();
    for py in 0..8 {
      for px in 0..8 {
        let expected = if (px, py) == (x, y) { index } else { 0 };
        assert_eq!(sheet.pixels.index_at(px, py), Some(expected), "{format} byte {byte} at ({px},{py})");
      }
    }
    assert_eq!(encode(&sheet.pixels, None, format).unwrap(), blob, "{format} byte {byte}");
  }
}

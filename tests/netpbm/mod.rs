use tilebin::{netpbm::*, *};

#[test]
fn test_sheet_survives_netpbm() {
  for format in TileFormat::ALL {
    let tile_bytes = format.descriptor().tile_byte_size();
    for len in [tile_bytes * 4, tile_bytes * 23 + 1] {
      let blob = super::rand_bytes(len);
      let sheet = decode(&blob, format).unwrap();
      let file = netpbm_write_sheet(&sheet, format).unwrap();
      let back = netpbm_read_sheet(&file).unwrap();
      assert_eq!(back.format, Some(format));
      assert_eq!(back.pixels, sheet.pixels);
      assert_eq!(encode(&back.pixels, back.surplus.as_deref(), format).unwrap(), blob);
    }
  }
}

#[test]
fn test_header_comments_are_found_anywhere() {
  let mut file = b"P7\nWIDTH 8\n# tilebin-surplus ff\nHEIGHT 8\nDEPTH 2\n".to_vec();
  file.extend_from_slice(b"# tilebin-format gba-4bpp\nMAXVAL 255\nTUPLTYPE GRAYSCALE_ALPHA\nENDHDR\n");
  file.extend_from_slice(&[0x07, 0xFF].repeat(64));
  let back = netpbm_read_sheet(&file).unwrap();
  assert_eq!(back.format, Some(TileFormat::Gba4bpp));
  assert_eq!(back.surplus.as_deref(), Some(&[0xFF_u8][..]));
  let out = encode(&back.pixels, back.surplus.as_deref(), TileFormat::Gba4bpp).unwrap();
  assert_eq!(out.len(), 33);
  assert_eq!(&out[..32], &[0x77; 32]);
}

#[test]
fn test_reader_never_panics() {
  for len in [0, 1, 2, 16, 300] {
    let mut file = b"P5 8 8 255\n".to_vec();
    file.extend(super::rand_bytes(len));
    let _ = netpbm_read_sheet(&file);
    let _ = netpbm_read_sheet(&super::rand_bytes(len));
  }
}

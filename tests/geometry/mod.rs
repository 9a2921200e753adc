use tilebin::*;

#[test]
fn test_geometry_is_monotonic() {
  for format in TileFormat::ALL {
    let d = format.descriptor();
    let mut last_height = 0;
    for len in (d.tile_byte_size() as u64)..(d.tile_byte_size() as u64 * 70) {
      let g = infer_geometry(len, d).unwrap();
      assert!(g.height >= last_height, "{format} at {len} bytes");
      assert!(g.width <= d.default_width);
      assert_eq!(g.width % 8, 0);
      assert_eq!(g.height % 8, 0);
      assert!(g.slot_count() >= g.tile_count);
      assert!(g.padding_count() < u64::from(g.width / 8));
      last_height = g.height;
    }
  }
}

#[test]
fn test_geometry_concrete() {
  let g = infer_geometry(32 * 100 + 5, TileFormat::Snes4bpp.descriptor()).unwrap();
  assert_eq!((g.width, g.height, g.tile_count, g.surplus), (128, 56, 100, 5));
  let g = infer_geometry(64 * 33, TileFormat::Gba8bpp.descriptor()).unwrap();
  assert_eq!((g.width, g.height, g.padding_count()), (256, 16, 31));
}

#[test]
fn test_geometry_below_one_tile() {
  for format in TileFormat::ALL {
    let d = format.descriptor();
    for len in 0..d.tile_byte_size() as u64 {
      assert_eq!(infer_geometry(len, d), Err(TileError::ZeroTileCount));
    }
  }
}

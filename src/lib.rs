#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]

//! Codecs for raw, headerless, tile graphics.
//!
//! Retro consoles and handhelds store their graphics as runs of 8x8 tiles,
//! with each pixel being a palette index of 1 to 8 bits. There's no header, no
//! width, and no palette. This crate converts between those raw bytes and an
//! ordinary indexed image ([`PixelBuffer`]) for the eleven layouts listed in
//! [`TileFormat`].
//!
//! * [`decode`] picks a sheet size from the blob length (see
//!   [`infer_geometry`]), unpacks every tile, and attaches a built-in palette.
//!   Tile slots past the end of the data are padding: index 0, transparent.
//!   Trailing bytes too short to be a tile are kept as the sheet's surplus.
//! * [`encode`] packs the sheet back up, skipping fully transparent tiles and
//!   re-appending the surplus, so an unedited sheet gives back the exact
//!   bytes it came from.
//!
//! With the `alloc` feature off only the allocation-free parts remain: the
//! format table, geometry inference, bit layouts and the palette tables.

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

pub mod pixel_formats;
pub use pixel_formats::*;

mod layout;
pub use layout::*;

mod format;
pub use format::*;

mod geometry;
pub use geometry::*;

mod palette;
pub use palette::*;

#[cfg(feature = "alloc")]
mod image;
#[cfg(feature = "alloc")]
pub use image::*;

#[cfg(feature = "alloc")]
mod decode;
#[cfg(feature = "alloc")]
pub use decode::*;

#[cfg(feature = "alloc")]
mod encode;
#[cfg(feature = "alloc")]
pub use encode::*;

#[cfg(feature = "alloc")]
#[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
pub mod netpbm;

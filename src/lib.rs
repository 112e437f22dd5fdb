//! A small, dependency-light encoder/decoder for the [QOI](https://qoiformat.org/)
//! ("Quite OK Image") lossless image format.
//!
//! QOI files are a fixed 14-byte header followed by a byte-oriented,
//! variable-length opcode stream: every pixel is encoded against a
//! 64-entry running cache and a differential prediction against the
//! previous pixel, using whichever of six opcodes is shortest. There is no
//! entropy coding stage and no block structure - decoding is a single
//! linear pass.
//!
//! ```
//! let pixels: [u8; 4] = [0x11, 0x22, 0x33, 0xff];
//! let encoded = qoi_codec::encode_to_vec(pixels, 1, 1).unwrap();
//! let (header, decoded) = qoi_codec::decode_file(&encoded).unwrap();
//! assert_eq!(header.width, 1);
//! assert_eq!(decoded, pixels);
//! ```
//!
//! # Features
//!
//! - `std` (default): enables `std::io::Write`-based streaming helpers and
//!   `std::error::Error` for [`Error`].
//! - `alloc`: enables the `Vec`-returning helpers (`*_to_vec`) without
//!   requiring all of `std`.
//!
//! # Scope
//!
//! This crate only encodes/decodes whole in-memory buffers: there is no
//! chunked/streaming *protocol*, no lossy mode, and no support for pixel
//! formats other than 8-bit-per-channel RGB/RGBA. Reading files from disk,
//! parsing other image formats, and command-line tooling are not part of
//! this crate - callers are expected to supply and consume plain byte
//! buffers.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(any(feature = "alloc", feature = "std"))]
extern crate alloc;

mod consts;
mod decode;
mod encode;
mod error;
mod header;
mod pixel;
mod types;
mod utils;

pub use crate::decode::{decode_file_to_buf, decode_header, decode_stream_to_buf, Decoder};
#[cfg(any(feature = "alloc", feature = "std"))]
pub use crate::decode::{decode_file, decode_stream};
pub use crate::encode::{encode_max_len, encode_to_buf, Encoder};
#[cfg(any(feature = "alloc", feature = "std"))]
pub use crate::encode::encode_to_vec;
pub use crate::error::{Error, Result};
pub use crate::header::Header;
pub use crate::pixel::Pixel;
pub use crate::types::{Channels, ColorSpace};

/// Encodes a raw RGB/RGBA pixel buffer into a complete QOI file.
///
/// The number of channels is inferred from `pixels.len() / (width * height)`
/// and must be 3 or 4.
#[cfg(any(feature = "alloc", feature = "std"))]
#[inline]
pub fn encode(
    pixels: impl AsRef<[u8]>, width: u32, height: u32,
) -> Result<alloc::vec::Vec<u8>> {
    encode_to_vec(pixels, width, height)
}

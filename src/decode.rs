//! The opcode-stream decoder (§4.2).
//!
//! `decode_impl` is the hot loop: byte-granular, bounds-checked on every
//! opcode boundary, and total over malformed input - every rejection is a
//! specific [`Error`] variant, never a panic or an out-of-bounds read.

#[cfg(any(feature = "alloc", feature = "std"))]
use alloc::vec;
#[cfg(any(feature = "alloc", feature = "std"))]
use alloc::vec::Vec;

use crate::consts::{
    QOI_CACHE_SIZE, QOI_HEADER_SIZE, QOI_MASK_2, QOI_OP_DIFF, QOI_OP_INDEX, QOI_OP_LUMA,
    QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN,
};
use crate::error::{Error, Result};
use crate::header::{checked_n_bytes, Header};
use crate::pixel::Pixel;
use crate::types::Channels;
use crate::utils::unlikely;

/// Decodes an opcode stream into `out`, which must be exactly
/// `n_pixels * channels` bytes long. Returns the number of input bytes
/// consumed (trailing bytes, including the end marker, are left unread).
fn decode_impl(data: &[u8], out: &mut [u8], n_pixels: usize, channels: u8) -> Result<usize> {
    let bpp = channels as usize;
    debug_assert_eq!(out.len(), n_pixels * bpp);

    let mut cache = [Pixel::new(); QOI_CACHE_SIZE];
    let mut prev = Pixel::new().with_a(0xff);
    let mut pos = 0_usize;
    let mut emitted = 0_usize;

    while emitted < n_pixels {
        if unlikely(pos >= data.len()) {
            return Err(Error::UnexpectedEof { decoded: emitted, expected: n_pixels });
        }
        let op_start = pos;
        let tag = data[pos];
        pos += 1;

        if tag & QOI_MASK_2 == QOI_OP_INDEX {
            // top two bits zero, so `tag` itself is already the cache index.
            prev = cache[tag as usize];
            write_pixel(out, emitted, prev, bpp);
            emitted += 1;
            continue;
        } else if tag == QOI_OP_RGB {
            if unlikely(pos + 3 > data.len()) {
                return Err(Error::TruncatedStream { offset: op_start });
            }
            prev.set_rgb(data[pos], data[pos + 1], data[pos + 2]);
            pos += 3;
        } else if tag == QOI_OP_RGBA {
            if unlikely(pos + 4 > data.len()) {
                return Err(Error::TruncatedStream { offset: op_start });
            }
            prev = Pixel::rgb(data[pos], data[pos + 1], data[pos + 2], data[pos + 3]);
            pos += 4;
        } else if tag & QOI_MASK_2 == QOI_OP_RUN {
            let run = (tag & 0x3f) as usize + 1;
            let remaining = n_pixels - emitted;
            if unlikely(run > remaining) {
                return Err(Error::RunOverflow { offset: op_start, remaining });
            }
            fill_run(out, emitted, run, prev, bpp);
            emitted += run;
            continue; // runs never touch the cache (§3, §9).
        } else if tag & QOI_MASK_2 == QOI_OP_DIFF {
            prev.apply_diff(tag);
        } else {
            debug_assert_eq!(tag & QOI_MASK_2, QOI_OP_LUMA);
            if unlikely(pos + 1 > data.len()) {
                return Err(Error::TruncatedStream { offset: op_start });
            }
            let b2 = data[pos];
            pos += 1;
            prev.apply_luma(tag, b2);
        }

        cache[prev.hash_index() as usize] = prev;
        write_pixel(out, emitted, prev, bpp);
        emitted += 1;
    }

    Ok(pos)
}

#[inline(always)]
fn write_pixel(out: &mut [u8], index: usize, px: Pixel, bpp: usize) {
    let start = index * bpp;
    out[start] = px.r;
    out[start + 1] = px.g;
    out[start + 2] = px.b;
    if bpp == 4 {
        out[start + 3] = px.a;
    }
}

#[inline(always)]
fn fill_run(out: &mut [u8], index: usize, run: usize, px: Pixel, bpp: usize) {
    let start = index * bpp;
    let end = start + run * bpp;
    for chunk in out[start..end].chunks_exact_mut(bpp) {
        chunk[0] = px.r;
        chunk[1] = px.g;
        chunk[2] = px.b;
        if bpp == 4 {
            chunk[3] = px.a;
        }
    }
}

/// Parses just the header, without touching the opcode stream.
#[inline]
pub fn decode_header(data: impl AsRef<[u8]>) -> Result<Header> {
    Header::decode(data)
}

/// Decodes a raw opcode stream (no header) into a newly allocated buffer,
/// given externally known dimensions and channel count.
#[cfg(any(feature = "alloc", feature = "std"))]
#[inline]
pub fn decode_stream(
    data: impl AsRef<[u8]>, width: u32, height: u32, channels: Channels,
) -> Result<Vec<u8>> {
    let size = checked_n_bytes(width, height, channels)?;
    let mut out = vec![0_u8; size];
    decode_stream_to_buf(data, width, height, channels, &mut out)?;
    Ok(out)
}

/// Decodes a raw opcode stream (no header) into a caller-provided buffer.
#[inline]
pub fn decode_stream_to_buf(
    data: impl AsRef<[u8]>, width: u32, height: u32, channels: Channels, out: &mut [u8],
) -> Result<()> {
    let size = checked_n_bytes(width, height, channels)?;
    if unlikely(out.len() != size) {
        return Err(Error::InvalidArgument { reason: "output buffer size does not match image" });
    }
    let n_pixels = (width as usize) * (height as usize); // can't overflow: checked above
    decode_impl(data.as_ref(), out, n_pixels, channels.as_u8())?;
    Ok(())
}

/// Decodes a complete QOI file (header + opcode stream) into a newly
/// allocated buffer.
#[cfg(any(feature = "alloc", feature = "std"))]
#[inline]
pub fn decode_file(data: impl AsRef<[u8]>) -> Result<(Header, Vec<u8>)> {
    let mut decoder = Decoder::new(&data)?;
    let out = decoder.decode_to_vec()?;
    Ok((*decoder.header(), out))
}

/// Decodes a complete QOI file into a caller-provided buffer.
#[inline]
pub fn decode_file_to_buf(data: impl AsRef<[u8]>, out: &mut [u8]) -> Result<Header> {
    let mut decoder = Decoder::new(&data)?;
    decoder.decode_to_buf(out)?;
    Ok(*decoder.header())
}

/// Decodes whole QOI files (header + opcode stream).
#[derive(Clone)]
pub struct Decoder<'a> {
    data: &'a [u8],
    header: Header,
}

impl<'a> Decoder<'a> {
    /// Parses the header and wraps the remaining opcode stream.
    #[inline]
    pub fn new(data: &'a (impl AsRef<[u8]> + ?Sized)) -> Result<Self> {
        let data = data.as_ref();
        let header = Header::decode(data)?;
        Ok(Self { data: &data[QOI_HEADER_SIZE..], header })
    }

    /// The header parsed out of the file.
    #[inline]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The image's declared channel count; decoded output always uses this
    /// many channels per pixel (no format conversion is performed).
    #[inline]
    pub const fn channels(&self) -> Channels {
        self.header.channels
    }

    /// Decodes into a newly allocated buffer of exactly `header().n_bytes()`
    /// bytes.
    #[cfg(any(feature = "alloc", feature = "std"))]
    #[inline]
    pub fn decode_to_vec(&mut self) -> Result<Vec<u8>> {
        let mut out = vec![0_u8; self.header.n_bytes()];
        self.decode_to_buf(&mut out)?;
        Ok(out)
    }

    /// Decodes into a caller-provided buffer, which must be exactly
    /// `header().n_bytes()` bytes long.
    #[inline]
    pub fn decode_to_buf(&mut self, out: &mut [u8]) -> Result<()> {
        let size = self.header.n_bytes();
        if unlikely(out.len() != size) {
            return Err(Error::InvalidArgument {
                reason: "output buffer size does not match image",
            });
        }
        let n_read =
            decode_impl(self.data, out, self.header.n_pixels(), self.header.channels.as_u8())?;
        self.data = &self.data[n_read..];
        Ok(())
    }
}

//! The per-pixel opcode selector and run-length coalescer (§4.3).

#[cfg(any(feature = "alloc", feature = "std"))]
use alloc::vec;
#[cfg(any(feature = "alloc", feature = "std"))]
use alloc::vec::Vec;
use core::convert::TryFrom;
#[cfg(feature = "std")]
use std::io::Write;

use crate::consts::{QOI_CACHE_SIZE, QOI_HEADER_SIZE, QOI_OP_INDEX, QOI_OP_RUN, QOI_PADDING, QOI_RUN_MAX};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::pixel::Pixel;
use crate::types::{Channels, ColorSpace};
#[cfg(feature = "std")]
use crate::utils::GenericWriter;
use crate::utils::{unlikely, BytesMut, Writer};

/// Reads the pixel at index `i` out of `data`, carrying `prev`'s alpha
/// forward when the source only has 3 channels (§3, §9: a 3-channel stream
/// never changes alpha, so this is equivalent to always being 255).
#[inline(always)]
fn read_pixel(data: &[u8], i: usize, bpp: usize, prev: Pixel) -> Pixel {
    let start = i * bpp;
    if bpp == 4 {
        Pixel::rgb(data[start], data[start + 1], data[start + 2], data[start + 3])
    } else {
        Pixel::rgb(data[start], data[start + 1], data[start + 2], prev.a)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn encode_impl<W: Writer>(mut buf: W, data: &[u8], n_pixels: usize, channels: u8) -> Result<usize> {
    let cap = buf.capacity();
    let bpp = channels as usize;

    let mut cache = [Pixel::new(); QOI_CACHE_SIZE];
    let mut prev = Pixel::new().with_a(0xff);

    let mut i = 0_usize;
    while i < n_pixels {
        let cur = read_pixel(data, i, bpp, prev);

        if cur == prev {
            let mut run = 1_usize;
            while i + run < n_pixels && read_pixel(data, i + run, bpp, prev) == prev {
                run += 1;
            }
            let mut remaining = run;
            while remaining > QOI_RUN_MAX as usize {
                buf = buf.write_one(QOI_OP_RUN | (QOI_RUN_MAX - 1))?;
                remaining -= QOI_RUN_MAX as usize;
            }
            if remaining > 0 {
                buf = buf.write_one(QOI_OP_RUN | (remaining as u8 - 1))?;
            }
            i += run;
            continue; // §3: a run leaves `prev` and the cache untouched.
        }

        let hash = cur.hash_index();
        let slot = &mut cache[hash as usize];
        if *slot == cur {
            buf = buf.write_one(QOI_OP_INDEX | hash)?;
        } else {
            *slot = cur;
            buf = cur.encode_into(prev, buf)?;
        }
        prev = cur;
        i += 1;
    }

    buf = buf.write_many(&QOI_PADDING)?;
    Ok(cap.saturating_sub(buf.capacity()))
}

/// The maximum number of bytes the encoded image will take.
///
/// Can be used to pre-allocate the buffer to encode the image into.
#[inline]
pub fn encode_max_len(width: u32, height: u32, channels: impl Into<u8>) -> usize {
    let (width, height) = (width as usize, height as usize);
    let n_pixels = width.saturating_mul(height);
    QOI_HEADER_SIZE + n_pixels.saturating_mul(channels.into() as usize + 1) + QOI_PADDING.len()
}

/// Encodes the image into a pre-allocated buffer.
///
/// Returns the total number of bytes written.
#[inline]
pub fn encode_to_buf(
    buf: impl AsMut<[u8]>, data: impl AsRef<[u8]>, width: u32, height: u32,
) -> Result<usize> {
    Encoder::new(&data, width, height)?.encode_to_buf(buf)
}

/// Encodes the image into a newly allocated vector.
#[cfg(any(feature = "alloc", feature = "std"))]
#[inline]
pub fn encode_to_vec(data: impl AsRef<[u8]>, width: u32, height: u32) -> Result<Vec<u8>> {
    Encoder::new(&data, width, height)?.encode_to_vec()
}

/// Encode QOI images into buffers or into streams.
pub struct Encoder<'a> {
    data: &'a [u8],
    header: Header,
}

impl<'a> Encoder<'a> {
    /// Creates a new encoder from a given array of pixel data and image
    /// dimensions. The data must be in RGB(A) order, row-major, with no
    /// extra stride.
    ///
    /// The number of channels is inferred from the buffer length (the valid
    /// values are 3 or 4). The colorspace is set to sRGB.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(data: &'a (impl AsRef<[u8]> + ?Sized), width: u32, height: u32) -> Result<Self> {
        let data = data.as_ref();
        if unlikely(width == 0 || height == 0) {
            return Err(Error::InvalidArgument { reason: "width and height must be non-zero" });
        }
        let n_pixels = (width as usize)
            .checked_mul(height as usize)
            .ok_or(Error::InvalidArgument { reason: "width * height overflows usize" })?;
        if unlikely(n_pixels == 0 || data.len() % n_pixels != 0) {
            return Err(Error::InvalidArgument {
                reason: "buffer length is not a multiple of the pixel count",
            });
        }
        let n_channels = data.len() / n_pixels;
        let channels = Channels::try_from(n_channels.min(0xff) as u8)
            .map_err(|_| Error::InvalidArgument { reason: "channel count must be 3 or 4" })?;
        let header = Header::try_new(width, height, channels, ColorSpace::default())?;
        Ok(Self { data, header })
    }

    /// Returns a new encoder with modified color space.
    ///
    /// Note: the color space doesn't affect encoding or decoding in any way,
    /// it's a purely informative field that's stored in the image header.
    #[inline]
    pub const fn with_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.header = self.header.with_colorspace(colorspace);
        self
    }

    /// Returns the inferred number of channels.
    #[inline]
    pub const fn channels(&self) -> Channels {
        self.header.channels
    }

    /// Returns the header that will be stored in the encoded image.
    #[inline]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The maximum number of bytes the encoded image will take.
    ///
    /// Can be used to pre-allocate the buffer to encode the image into.
    #[inline]
    pub fn required_buf_len(&self) -> usize {
        self.header.encode_max_len()
    }

    /// Encodes the image to a pre-allocated buffer and returns the number of
    /// bytes written.
    ///
    /// The minimum size of the buffer can be found via
    /// [`Encoder::required_buf_len`].
    #[inline]
    pub fn encode_to_buf(&self, mut buf: impl AsMut<[u8]>) -> Result<usize> {
        let buf = buf.as_mut();
        let size_required = self.required_buf_len();
        if unlikely(buf.len() < size_required) {
            return Err(Error::InvalidArgument { reason: "destination buffer is too small" });
        }
        let (head, tail) = buf.split_at_mut(QOI_HEADER_SIZE); // can't panic
        head.copy_from_slice(&self.header.encode());
        let n_written = encode_impl(
            BytesMut::new(tail),
            self.data,
            self.header.n_pixels(),
            self.header.channels.as_u8(),
        )?;
        Ok(QOI_HEADER_SIZE + n_written)
    }

    /// Encodes the image into a newly allocated vector of bytes and returns
    /// it.
    #[cfg(any(feature = "alloc", feature = "std"))]
    #[inline]
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut out = vec![0_u8; self.required_buf_len()];
        let size = self.encode_to_buf(&mut out)?;
        out.truncate(size);
        Ok(out)
    }

    /// Encodes the image directly to a generic writer that implements
    /// [`Write`](std::io::Write).
    ///
    /// Note: while it's possible to pass a `&mut [u8]` slice here since it
    /// implements `Write`, it's more efficient to use a specialized method
    /// instead: [`Encoder::encode_to_buf`].
    #[cfg(feature = "std")]
    #[inline]
    pub fn encode_to_stream<W: Write>(&self, writer: &mut W) -> Result<usize> {
        writer.write_all(&self.header.encode()).map_err(|_| Error::OutOfMemory)?;
        let n_written = encode_impl(
            GenericWriter::new(writer),
            self.data,
            self.header.n_pixels(),
            self.header.channels.as_u8(),
        )?;
        Ok(n_written + QOI_HEADER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_file;

    #[test]
    fn infers_rgb_channels() {
        let data = [0_u8; 2 * 2 * 3];
        let enc = Encoder::new(&data, 2, 2).unwrap();
        assert_eq!(enc.channels(), Channels::Rgb);
    }

    #[test]
    fn infers_rgba_channels() {
        let data = [0_u8; 2 * 2 * 4];
        let enc = Encoder::new(&data, 2, 2).unwrap();
        assert_eq!(enc.channels(), Channels::Rgba);
    }

    #[test]
    fn rejects_mismatched_buffer_length() {
        let data = [0_u8; 12]; // 2*2*3, not a multiple of 3*3=9 pixels
        assert!(matches!(Encoder::new(&data, 3, 3), Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn single_pixel_round_trips() {
        let data = [17_u8, 34, 51, 255];
        let qoi = encode_to_vec(data, 1, 1).unwrap();
        let (header, pixels) = decode_file(&qoi).unwrap();
        assert_eq!(header.channels, Channels::Rgba);
        assert_eq!(pixels, data);
    }

    #[test]
    fn single_pixel_channels_4_uses_rgb_opcode_when_alpha_matches_initial_predictor() {
        let data = [17_u8, 34, 51, 255];
        let qoi = encode_to_vec(data, 1, 1).unwrap();
        // header (14) + RGB opcode (4) + end marker (8)
        assert_eq!(qoi.len(), 14 + 4 + 8);
        assert_eq!(&qoi[14..18], &[0xfe, 17, 34, 51]);
    }

    #[test]
    fn luma_out_of_range_falls_back_to_rgb() {
        let prev = Pixel::rgb(100, 100, 100, 255);
        let cur = Pixel::rgb(95, 68, 60, 255);
        let mut out = Vec::new();
        cur.encode_into(prev, VecWriter(&mut out)).unwrap();
        assert_eq!(out[0], 0xfe); // RGB tag, not LUMA (0x80..=0xbf)
    }

    /// A tiny `Writer` impl over a growable `Vec`, used only to probe
    /// `Pixel::encode_into` in isolation without going through a whole image.
    struct VecWriter<'a>(&'a mut Vec<u8>);

    impl<'a> Writer for VecWriter<'a> {
        fn capacity(&self) -> usize {
            usize::MAX
        }

        fn write_one(self, byte: u8) -> Result<Self> {
            self.0.push(byte);
            Ok(self)
        }

        fn write_many(self, bytes: &[u8]) -> Result<Self> {
            self.0.extend_from_slice(bytes);
            Ok(self)
        }
    }
}

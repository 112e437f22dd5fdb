//! The fixed 14-byte QOI file header: `qoif` + big-endian width/height +
//! channel count + colorspace (§4.1).

use core::convert::TryFrom;

use crate::consts::{QOI_HEADER_SIZE, QOI_MAGIC, QOI_PADDING_SIZE};
use crate::error::{Error, Result};
use crate::types::{Channels, ColorSpace};
use crate::utils::unlikely;

/// A parsed (or about-to-be-written) QOI header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
    pub colorspace: ColorSpace,
}

/// Computes `width * height * channels` with overflow checking, per §6's
/// "Dimensions limit" (the product must fit the platform's address space).
/// Shared by header construction/parsing and by the stream-only decode
/// entry points, which take the same three values from a caller or from a
/// (possibly hostile) file header.
#[inline]
pub(crate) fn checked_n_bytes(width: u32, height: u32, channels: Channels) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n_pixels| n_pixels.checked_mul(channels.as_u8() as usize))
        .ok_or(Error::InvalidArgument { reason: "width * height * channels overflows usize" })
}

impl Header {
    /// Validates dimensions/channels/colorspace and builds a header for
    /// encoding. Width and height must be positive and their total byte
    /// count must fit in `usize` (the dimension limit of §6).
    #[inline]
    pub fn try_new(
        width: u32, height: u32, channels: Channels, colorspace: ColorSpace,
    ) -> Result<Self> {
        if unlikely(width == 0 || height == 0) {
            return Err(Error::InvalidArgument { reason: "width and height must be non-zero" });
        }
        checked_n_bytes(width, height, channels)?;
        Ok(Self { width, height, channels, colorspace })
    }

    /// Returns a copy of this header with a different colorspace tag.
    #[inline]
    pub const fn with_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.colorspace = colorspace;
        self
    }

    /// Parses the leading 14 bytes of `data` as a QOI header.
    #[inline]
    pub fn decode(data: impl AsRef<[u8]>) -> Result<Self> {
        let data = data.as_ref();
        if unlikely(data.len() < QOI_HEADER_SIZE) {
            return Err(Error::TruncatedHeader { len: data.len() });
        }
        let magic = [data[0], data[1], data[2], data[3]];
        if unlikely(magic != QOI_MAGIC) {
            return Err(Error::BadMagic { found: magic });
        }
        let width = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
        let height = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
        let channels = Channels::try_from(data[12])?;
        let colorspace = ColorSpace::try_from(data[13])?;
        // A crafted file can declare arbitrary width/height; reject here,
        // before any caller multiplies them into a buffer size, rather than
        // overflowing (or panicking, in a debug build) downstream.
        checked_n_bytes(width, height, channels)?;
        Ok(Self { width, height, channels, colorspace })
    }

    /// Serializes this header to the wire format.
    #[inline]
    pub fn encode(&self) -> [u8; QOI_HEADER_SIZE] {
        let mut out = [0_u8; QOI_HEADER_SIZE];
        out[0..4].copy_from_slice(&QOI_MAGIC);
        out[4..8].copy_from_slice(&self.width.to_be_bytes());
        out[8..12].copy_from_slice(&self.height.to_be_bytes());
        out[12] = self.channels.as_u8();
        out[13] = self.colorspace.as_u8();
        out
    }

    /// Number of pixels described by this header.
    ///
    /// Every `Header` is built through [`Header::try_new`] or
    /// [`Header::decode`], both of which reject dimensions whose byte count
    /// would overflow `usize`, so this multiplication cannot wrap.
    #[inline]
    pub const fn n_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of raw pixel-data bytes this header's image decodes to.
    #[inline]
    pub const fn n_bytes(&self) -> usize {
        self.n_pixels() * self.channels.as_u8() as usize
    }

    /// A conservative upper bound on the size of the encoded file (header +
    /// opcode stream + end marker): every pixel costs at most 5 bytes.
    #[inline]
    pub const fn encode_max_len(&self) -> usize {
        QOI_HEADER_SIZE + self.n_pixels() * (self.channels.as_u8() as usize + 1) + QOI_PADDING_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_wire_format() {
        let header = Header::try_new(64, 100, Channels::Rgba, ColorSpace::Linear).unwrap();
        let bytes = header.encode();
        assert_eq!(Header::decode(bytes).unwrap(), header);
    }

    #[test]
    fn rejects_short_input() {
        let bytes = [0_u8; 13];
        assert_eq!(Header::decode(bytes), Err(Error::TruncatedHeader { len: 13 }));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = Header::try_new(1, 1, Channels::Rgb, ColorSpace::Srgb).unwrap().encode();
        bytes[0..4].copy_from_slice(b"xxxx");
        assert_eq!(Header::decode(bytes), Err(Error::BadMagic { found: *b"xxxx" }));
    }

    #[test]
    fn rejects_bad_channels() {
        let mut bytes = Header::try_new(1, 1, Channels::Rgb, ColorSpace::Srgb).unwrap().encode();
        bytes[12] = 7;
        assert_eq!(Header::decode(bytes), Err(Error::BadChannels { channels: 7 }));
    }

    #[test]
    fn rejects_bad_colorspace() {
        let mut bytes = Header::try_new(1, 1, Channels::Rgb, ColorSpace::Srgb).unwrap().encode();
        bytes[13] = 9;
        assert_eq!(Header::decode(bytes), Err(Error::BadColorspace { colorspace: 9 }));
    }

    #[test]
    fn rejects_dimensions_whose_byte_count_overflows_usize() {
        // width * height alone just barely fits in u64; * channels does not.
        let mut bytes = Header::try_new(1, 1, Channels::Rgba, ColorSpace::Srgb).unwrap().encode();
        bytes[4..8].copy_from_slice(&u32::MAX.to_be_bytes());
        bytes[8..12].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(Header::decode(bytes), Err(Error::InvalidArgument { .. })));
    }
}

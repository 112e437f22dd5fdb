//! Small validated value types that appear in the file header.

use core::convert::TryFrom;
use core::fmt;

use crate::error::Error;

/// Number of channels stored per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channels {
    /// 3 channels per pixel: red, green, blue. Alpha is assumed to be 255.
    Rgb = 3,
    /// 4 channels per pixel: red, green, blue, alpha.
    Rgba = 4,
}

impl Channels {
    /// Returns the number of bytes a single pixel occupies in the raw buffer.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Default for Channels {
    #[inline]
    fn default() -> Self {
        Self::Rgba
    }
}

impl From<Channels> for u8 {
    #[inline]
    fn from(channels: Channels) -> Self {
        channels.as_u8()
    }
}

impl TryFrom<u8> for Channels {
    type Error = Error;

    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            channels => Err(Error::BadChannels { channels }),
        }
    }
}

impl fmt::Display for Channels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
        })
    }
}

/// The informative colorspace tag carried in the header.
///
/// This codec never converts between colorspaces; the value is passed
/// through as metadata only (§3, §4.1 of the governing specification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColorSpace {
    /// sRGB with linear alpha.
    Srgb = 0,
    /// All channels linear.
    Linear = 1,
}

impl ColorSpace {
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Default for ColorSpace {
    #[inline]
    fn default() -> Self {
        Self::Srgb
    }
}

impl From<ColorSpace> for u8 {
    #[inline]
    fn from(colorspace: ColorSpace) -> Self {
        colorspace.as_u8()
    }
}

impl TryFrom<u8> for ColorSpace {
    type Error = Error;

    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Srgb),
            1 => Ok(Self::Linear),
            colorspace => Err(Error::BadColorspace { colorspace }),
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Srgb => "sRGB",
            Self::Linear => "linear",
        })
    }
}

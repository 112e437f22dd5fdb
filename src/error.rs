//! The error taxonomy surfaced by every fallible operation in this crate.
//!
//! There is deliberately no dependency on `thiserror`/`anyhow` here (the only
//! dependency this crate carries at all is `bytemuck`, for the pixel cache):
//! the variants carry structured fields rather than formatted strings so
//! callers can `matches!` on the exact cause of a rejection, as required by
//! the governing specification's test-suite contract (§7).

use core::fmt;

/// Crate-wide result alias.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything that can go wrong decoding or encoding a QOI image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The input is shorter than the 14-byte fixed header.
    TruncatedHeader {
        /// Number of bytes actually available.
        len: usize,
    },
    /// The header's first 4 bytes are not `qoif`.
    BadMagic {
        /// The 4 bytes that were found instead.
        found: [u8; 4],
    },
    /// The header's channel count is neither 3 nor 4.
    BadChannels {
        /// The offending byte.
        channels: u8,
    },
    /// The header's colorspace byte is neither 0 nor 1.
    BadColorspace {
        /// The offending byte.
        colorspace: u8,
    },
    /// The opcode stream ended in the middle of a multi-byte opcode.
    TruncatedStream {
        /// Byte offset into the opcode stream where the cut occurred.
        offset: usize,
    },
    /// The opcode stream ran out before the declared pixel count was reached.
    UnexpectedEof {
        /// Pixels successfully decoded before the stream ran dry.
        decoded: usize,
        /// Pixels the header/call site declared.
        expected: usize,
    },
    /// A `RUN` opcode would have emitted more pixels than remain in the image.
    RunOverflow {
        /// Byte offset of the offending `RUN` opcode.
        offset: usize,
        /// Pixels left in the output budget at the time.
        remaining: usize,
    },
    /// A caller-supplied argument (width, height, channel count, ...) is out
    /// of range.
    InvalidArgument {
        /// Human-readable explanation; not matched on by callers.
        reason: &'static str,
    },
    /// A heap allocation failed.
    OutOfMemory,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::TruncatedHeader { len } => {
                write!(f, "truncated header: need 14 bytes, got {len}")
            }
            Self::BadMagic { found } => {
                write!(f, "bad magic bytes: {found:?} (expected \"qoif\")")
            }
            Self::BadChannels { channels } => {
                write!(f, "bad channel count: {channels} (expected 3 or 4)")
            }
            Self::BadColorspace { colorspace } => {
                write!(f, "bad colorspace: {colorspace} (expected 0 or 1)")
            }
            Self::TruncatedStream { offset } => {
                write!(f, "truncated opcode stream at offset {offset}")
            }
            Self::UnexpectedEof { decoded, expected } => {
                write!(f, "unexpected end of stream: decoded {decoded} of {expected} pixels")
            }
            Self::RunOverflow { offset, remaining } => {
                write!(f, "run at offset {offset} overflows remaining budget of {remaining} pixels")
            }
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::OutOfMemory => write!(f, "out of memory"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

//! Branch hints and the small writer abstraction the encoder's hot loop is
//! generic over (plain byte slices vs. [`std::io::Write`]).

#[cfg(feature = "std")]
use std::io::Write;

use crate::error::{Error, Result};

/// Hints to the optimizer that `b` is rarely `true`.
#[cold]
#[inline(always)]
pub fn cold() {}

#[inline(always)]
pub fn unlikely(b: bool) -> bool {
    if b {
        cold();
    }
    b
}

/// A destination the encoder can append bytes to.
///
/// Implemented once for a pre-allocated byte slice (used by the `_to_buf`/
/// `_to_vec` entry points) and once for any [`std::io::Write`] (used by
/// `_to_stream`), so the encoder's per-pixel hot loop is written only once
/// and monomorphized over both.
pub trait Writer: Sized {
    /// Bytes still available to write into (slice writers) or `usize::MAX`
    /// (stream writers, which never run out).
    fn capacity(&self) -> usize;

    fn write_one(self, byte: u8) -> Result<Self>;

    fn write_many(self, bytes: &[u8]) -> Result<Self>;
}

/// Writer backed by an in-memory byte slice; writes are plain copies.
pub struct BytesMut<'a> {
    buf: &'a mut [u8],
}

impl<'a> BytesMut<'a> {
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf }
    }
}

impl<'a> Writer for BytesMut<'a> {
    #[inline(always)]
    fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline(always)]
    fn write_one(self, byte: u8) -> Result<Self> {
        // Running out of room here means the caller's destination buffer
        // was too small, not that an allocation failed - no allocation is
        // attempted by this writer at all.
        let (head, tail) = match self.buf.split_first_mut() {
            Some(pair) => pair,
            None => {
                return Err(Error::InvalidArgument { reason: "destination buffer is too small" })
            }
        };
        *head = byte;
        Ok(Self::new(tail))
    }

    #[inline(always)]
    fn write_many(self, bytes: &[u8]) -> Result<Self> {
        if unlikely(self.buf.len() < bytes.len()) {
            return Err(Error::InvalidArgument { reason: "destination buffer is too small" });
        }
        let (head, tail) = self.buf.split_at_mut(bytes.len());
        head.copy_from_slice(bytes);
        Ok(Self::new(tail))
    }
}

/// Writer backed by any [`std::io::Write`] implementor.
///
/// `capacity()` here doesn't track real remaining space (a stream never runs
/// out) - it counts *down* from `usize::MAX` as bytes are written, so the
/// same `cap_before.saturating_sub(cap_after)` trick the slice writer uses to
/// compute "bytes written" keeps working for both writer kinds.
#[cfg(feature = "std")]
pub struct GenericWriter<'a, W: Write> {
    writer: &'a mut W,
    written: usize,
}

#[cfg(feature = "std")]
impl<'a, W: Write> GenericWriter<'a, W> {
    #[inline]
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer, written: 0 }
    }
}

#[cfg(feature = "std")]
impl<'a, W: Write> Writer for GenericWriter<'a, W> {
    #[inline(always)]
    fn capacity(&self) -> usize {
        usize::MAX - self.written
    }

    #[inline(always)]
    fn write_one(mut self, byte: u8) -> Result<Self> {
        self.writer.write_all(&[byte]).map_err(|_| Error::OutOfMemory)?;
        self.written += 1;
        Ok(self)
    }

    #[inline(always)]
    fn write_many(mut self, bytes: &[u8]) -> Result<Self> {
        self.writer.write_all(bytes).map_err(|_| Error::OutOfMemory)?;
        self.written += bytes.len();
        Ok(self)
    }
}

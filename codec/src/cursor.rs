//! Immutable read position over an encoded buffer.

use crate::Error;
use bytes::Bytes;

/// A buffer and an offset into it.
///
/// Reading never mutates a [Cursor]: [Cursor::read] consumes it and returns the bytes read
/// together with a new cursor positioned after them. The offset never exceeds the length of
/// the buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    buf: Bytes,
    offset: usize,
}

impl Cursor {
    /// Creates a cursor at the start of `buf`.
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self {
            buf: buf.into(),
            offset: 0,
        }
    }

    /// Returns the underlying buffer (including bytes already read).
    pub fn buffer(&self) -> &Bytes {
        &self.buf
    }

    /// Returns the number of bytes already read.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// Returns true if every byte of the buffer has been read.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads the next `n` bytes.
    ///
    /// Returns [Error::EndOfBuffer] if fewer than `n` bytes remain. The returned [Bytes] shares
    /// the underlying allocation.
    pub fn read(self, n: usize) -> Result<(Bytes, Self), Error> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(Error::EndOfBuffer {
                needed: n,
                remaining,
            });
        }
        let end = self.offset + n;
        let data = self.buf.slice(self.offset..end);
        Ok((
            data,
            Self {
                buf: self.buf,
                offset: end,
            },
        ))
    }
}

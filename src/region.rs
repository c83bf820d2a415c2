//! Bounds-checked regions of the data being decoded.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use bytes::Bytes;
use crate::error::{Error, Pos};


//------------ Region --------------------------------------------------------

/// A region of a buffer that is being decoded.
///
/// The region keeps the complete buffer around and tracks the range of it
/// that is still available. Consuming octets moves the start of the range
/// forward. Because the buffer is a [`Bytes`] value, taking octets out of
/// the region doesn’t copy them.
///
/// All positions reported by the region, including those in errors, are
/// relative to the start of the complete buffer. If the region was created
/// from a copy of part of a slice, they are relative to the start of the
/// slice.
#[derive(Clone, Debug)]
pub struct Region {
    /// The complete buffer.
    data: Bytes,

    /// The position of the first octet of `data`.
    base: usize,

    /// The index of the first available octet.
    start: usize,

    /// The index one past the last available octet.
    end: usize,
}

impl Region {
    /// Creates a new region of `len` octets starting at `offset`.
    ///
    /// Returns a parameter error if the buffer is empty or if the region
    /// doesn’t fit into the buffer.
    pub fn new(data: Bytes, offset: usize, len: usize) -> Result<Self, Error> {
        let end = Self::check_bounds(data.len(), offset, len)?;
        Ok(Region { data, base: 0, start: offset, end })
    }

    /// Creates a region from a copy of `len` octets of a slice.
    ///
    /// Only the octets of the region are copied. Positions are still
    /// relative to the start of `data`.
    pub fn copy_from_slice(
        data: &[u8], offset: usize, len: usize
    ) -> Result<Self, Error> {
        let end = Self::check_bounds(data.len(), offset, len)?;
        Ok(Region {
            data: Bytes::copy_from_slice(&data[offset..end]),
            base: offset,
            start: 0,
            end: len,
        })
    }

    /// Checks that a region fits into a buffer and returns its end.
    fn check_bounds(
        buf_len: usize, offset: usize, len: usize
    ) -> Result<usize, Error> {
        if buf_len == 0 {
            return Err(Error::Param("input buffer has zero length"))
        }
        match offset.checked_add(len) {
            Some(end) if end <= buf_len => Ok(end),
            _ => {
                Err(Error::Param("offset and length exceed the input buffer"))
            }
        }
    }

    /// Creates a region covering the complete buffer.
    pub fn from_bytes(data: Bytes) -> Result<Self, Error> {
        let len = data.len();
        Self::new(data, 0, len)
    }

    /// Returns the position of the next octet.
    pub fn pos(&self) -> Pos {
        (self.base + self.start).into()
    }

    /// Returns the number of octets left in the region.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns whether the region has been consumed completely.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the remaining octets as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.start..self.end]
    }

    /// Returns the n-th remaining octet without consuming anything.
    pub fn peek_nth(&self, n: usize) -> Result<u8, Error> {
        self.as_slice().get(n).copied().ok_or_else(|| {
            Error::TruncatedInput(
                (self.base + self.start).saturating_add(n).into()
            )
        })
    }

    /// Takes a single octet from the region.
    pub fn take_u8(&mut self) -> Result<u8, Error> {
        let res = self.peek_nth(0)?;
        self.start += 1;
        Ok(res)
    }

    /// Takes the next `len` octets from the region.
    pub fn take_bytes(&mut self, len: usize) -> Result<Bytes, Error> {
        if len > self.len() {
            return Err(Error::TruncatedInput(self.pos()))
        }
        let res = self.data.slice(self.start..self.start + len);
        self.start += len;
        Ok(res)
    }

    /// Splits off the next `len` octets as a region of their own.
    ///
    /// The octets are consumed from `self`.
    pub fn split_to(&mut self, len: usize) -> Result<Region, Error> {
        if len > self.len() {
            return Err(Error::TruncatedInput(self.pos()))
        }
        let res = Region {
            data: self.data.clone(),
            base: self.base,
            start: self.start,
            end: self.start + len,
        };
        self.start += len;
        Ok(res)
    }

    /// Returns the octets between `start` and the current position.
    ///
    /// This is used to capture the complete encoding of a value after it
    /// has been decoded.
    pub(crate) fn captured_since(&self, start: Pos) -> Bytes {
        self.data.slice(start.offset() - self.base..self.start)
    }
}


//============ Tests =========================================================

//! Binary reader for bounds-checked parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! little-endian values from a byte slice without copying the slice.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A binary reader over a borrowed byte slice.
///
/// Every read is bounds-checked and fails with [`Error::UnexpectedEof`]
/// instead of reading past the end of the data.
///
/// # Example
///
/// ```
/// use vtex_common::BinaryReader;
///
/// let data = [0x56, 0x54, 0x46, 0x00, 0x07, 0x00, 0x00, 0x00];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_array::<4>().unwrap(), *b"VTF\0");
/// assert_eq!(reader.read_u32().unwrap(), 7);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Create a new reader starting at a specific position.
    ///
    /// Fails if `position` lies past the end of `data`.
    #[inline]
    pub fn new_at(data: &'a [u8], position: usize) -> Result<Self> {
        let mut reader = Self::new(data);
        reader.seek(position)?;
        Ok(reader)
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek to an absolute position.
    #[inline]
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(Error::OffsetOutOfBounds {
                offset: position,
                len: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Skip over a number of bytes.
    #[inline]
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-size byte array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Read a little-endian i32.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    /// Read a little-endian f32.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_array().map(f32::from_le_bytes)
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }
}

//! Decoded pixel storage.

use crate::{Error, Result};

/// A row-major 8-bit RGB or RGBA image with an explicit row stride.
///
/// Rows may be padded; decoders address pixels through the row stride and
/// never assume rows are tightly packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    has_alpha: bool,
    rowstride: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer with rows aligned to 4 bytes.
    pub fn new(width: u32, height: u32, has_alpha: bool) -> Result<Self> {
        let channels = if has_alpha { 4 } else { 3 };
        let row_bytes = (width as usize)
            .checked_mul(channels)
            .and_then(|bytes| bytes.checked_add(3))
            .ok_or(Error::OutOfMemory { requested: usize::MAX })?;
        Self::with_rowstride(width, height, has_alpha, row_bytes & !3)
    }

    /// Allocate a zeroed buffer with a caller-chosen row stride.
    ///
    /// The stride must hold at least one full row of pixels.
    pub fn with_rowstride(width: u32, height: u32, has_alpha: bool, rowstride: usize) -> Result<Self> {
        let channels = if has_alpha { 4 } else { 3 };
        let row_bytes = (width as usize).saturating_mul(channels);
        if rowstride < row_bytes {
            return Err(Error::BufferMismatch(format!(
                "row stride {} is smaller than a {}-pixel row ({} bytes)",
                rowstride, width, row_bytes
            )));
        }

        let len = rowstride
            .checked_mul(height as usize)
            .ok_or(Error::OutOfMemory { requested: usize::MAX })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::OutOfMemory { requested: len })?;
        data.resize(len, 0);

        Ok(Self {
            width,
            height,
            has_alpha,
            rowstride,
            data,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether pixels carry an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Channels per pixel (3 or 4).
    pub fn n_channels(&self) -> usize {
        if self.has_alpha {
            4
        } else {
            3
        }
    }

    /// Distance in bytes between the starts of consecutive rows.
    pub fn rowstride(&self) -> usize {
        self.rowstride
    }

    /// Raw storage including row padding.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Pixel bytes of row `y`, without padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.rowstride;
        &self.data[start..start + self.width as usize * self.n_channels()]
    }

    /// Mutable pixel bytes of row `y`, without padding.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.rowstride;
        let len = self.width as usize * self.n_channels();
        &mut self.data[start..start + len]
    }

    /// Channels of the pixel at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let channels = self.n_channels();
        let start = y as usize * self.rowstride + x as usize * channels;
        &self.data[start..start + channels]
    }

    /// Overwrite the pixel at (`x`, `y`) with the leading channels of `value`.
    #[inline]
    pub(crate) fn put_pixel(&mut self, x: u32, y: u32, value: &[u8; 4]) {
        let channels = self.n_channels();
        let start = y as usize * self.rowstride + x as usize * channels;
        self.data[start..start + channels].copy_from_slice(&value[..channels]);
    }

    /// Copy the pixels into a tightly packed vector (no row padding).
    pub fn to_packed(&self) -> Vec<u8> {
        (0..self.height).flat_map(|y| self.row(y).iter().copied()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rowstride_alignment() {
        let rgb = PixelBuffer::new(5, 2, false).unwrap();
        assert_eq!(rgb.rowstride(), 16);
        assert_eq!(rgb.pixels().len(), 32);

        let rgba = PixelBuffer::new(5, 2, true).unwrap();
        assert_eq!(rgba.rowstride(), 20);
    }

    #[test]
    fn test_custom_rowstride() {
        assert!(matches!(
            PixelBuffer::with_rowstride(4, 4, true, 15),
            Err(Error::BufferMismatch(_))
        ));

        let mut buf = PixelBuffer::with_rowstride(2, 2, true, 64).unwrap();
        buf.put_pixel(1, 1, &[1, 2, 3, 4]);
        assert_eq!(buf.pixel(1, 1), &[1, 2, 3, 4]);
        assert_eq!(&buf.pixels()[64 + 4..64 + 8], &[1, 2, 3, 4]);
        assert_eq!(buf.row(1), &[0, 0, 0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_to_packed_drops_padding() {
        let mut buf = PixelBuffer::new(1, 2, false).unwrap();
        buf.put_pixel(0, 0, &[1, 2, 3, 99]);
        buf.put_pixel(0, 1, &[4, 5, 6, 99]);
        assert_eq!(buf.rowstride(), 4);
        assert_eq!(buf.to_packed(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_oversized_buffer_is_oom() {
        let err = PixelBuffer::with_rowstride(u32::MAX, u32::MAX, true, usize::MAX).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::OutOfMemory);

        // Fits in usize but not in the address space.
        let err = PixelBuffer::with_rowstride(1, 1, true, isize::MAX as usize + 1).unwrap_err();
        assert!(matches!(err, Error::OutOfMemory { .. }));
    }
}

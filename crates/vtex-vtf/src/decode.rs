//! High-resolution frame decoding.

use byteorder::{ByteOrder, LittleEndian};
use log::warn;
use vtex_common::BinaryReader;
use zerocopy::FromBytes;

use crate::block::{decode_dxt1, decode_dxt5, expand_rgb565, Dxt1Block, Dxt5Block, Tile};
use crate::{Error, ImageFormat, PixelBuffer, Result};

/// Decode one `out.width()` x `out.height()` surface of `format` from the
/// reader's current position into `out`.
///
/// The reader advances past the consumed surface. Fails without touching
/// `out` if the format has no decoder, `out` does not carry the channels
/// the format decodes to, or the data is too short.
pub fn decode_surface(format: ImageFormat, reader: &mut BinaryReader<'_>, out: &mut PixelBuffer) -> Result<()> {
    let encoding = supported_encoding(format)?;
    if encoding.has_alpha() != out.has_alpha() {
        return Err(Error::BufferMismatch(format!(
            "{} decodes to {} channels, buffer has {}",
            format,
            encoding.channels(),
            out.n_channels()
        )));
    }

    let size = encoding.surface_size(out.width(), out.height());
    let size = usize::try_from(size).map_err(|_| Error::OutOfMemory { requested: usize::MAX })?;
    let src = reader.read_bytes(size)?;

    match format {
        ImageFormat::Rgba8888 => unpack_pixels::<4>(src, out, |p| [p[0], p[1], p[2], p[3]]),
        ImageFormat::Abgr8888 => unpack_pixels::<4>(src, out, |p| [p[3], p[2], p[1], p[0]]),
        ImageFormat::Rgb888 => unpack_pixels::<3>(src, out, |p| [p[0], p[1], p[2], 255]),
        ImageFormat::Bgr888 => unpack_pixels::<3>(src, out, |p| [p[2], p[1], p[0], 255]),
        ImageFormat::Rgb565 => unpack_pixels::<2>(src, out, |p| {
            let [r, g, b] = expand_rgb565(LittleEndian::read_u16(p));
            [r, g, b, 255]
        }),
        ImageFormat::I8 => unpack_pixels::<1>(src, out, |p| [p[0], p[0], p[0], 255]),
        ImageFormat::Ia88 => unpack_pixels::<2>(src, out, |p| [p[0], p[0], p[0], p[1]]),
        ImageFormat::A8 => unpack_pixels::<1>(src, out, |p| [255, 255, 255, p[0]]),
        // Same store order as the gdk-pixbuf loader: bytes land in G, B, A, R.
        ImageFormat::Argb8888 => unpack_pixels::<4>(src, out, |p| [p[3], p[0], p[1], p[2]]),
        ImageFormat::Bgra8888 => unpack_pixels::<4>(src, out, |p| [p[2], p[1], p[0], p[3]]),
        ImageFormat::Dxt1 => unpack_blocks::<Dxt1Block>(src, out, decode_dxt1)?,
        ImageFormat::Dxt5 => unpack_blocks::<Dxt5Block>(src, out, decode_dxt5)?,
        ImageFormat::None
        | ImageFormat::P8
        | ImageFormat::Rgb888Bluescreen
        | ImageFormat::Bgr888Bluescreen
        | ImageFormat::Dxt3
        | ImageFormat::Bgrx8888
        | ImageFormat::Bgr565
        | ImageFormat::Bgrx5551
        | ImageFormat::Bgra4444
        | ImageFormat::Dxt1OneBitAlpha
        | ImageFormat::Bgra5551
        | ImageFormat::Uv88
        | ImageFormat::Uvwq8888
        | ImageFormat::Rgba16161616F
        | ImageFormat::Rgba16161616
        | ImageFormat::Uvlx8888
        | ImageFormat::Unknown(_) => return Err(unsupported(format)),
    }

    Ok(())
}

/// Storage layout of `format`, or an unsupported-format error.
pub fn supported_encoding(format: ImageFormat) -> Result<crate::Encoding> {
    format.encoding().ok_or_else(|| unsupported(format))
}

fn unsupported(format: ImageFormat) -> Error {
    warn!("unsupported VTF format {} ({})", format, format.tag());
    Error::UnsupportedFormat {
        tag: format.tag(),
        name: format.name(),
    }
}

/// Convert `N`-byte source pixels, row by row, into `out`.
fn unpack_pixels<const N: usize>(src: &[u8], out: &mut PixelBuffer, convert: impl Fn(&[u8]) -> [u8; 4]) {
    let channels = out.n_channels();
    let src_row = out.width() as usize * N;
    if src_row == 0 {
        return;
    }

    for (y, row) in (0..out.height()).zip(src.chunks_exact(src_row)) {
        for (dst, px) in out.row_mut(y).chunks_exact_mut(channels).zip(row.chunks_exact(N)) {
            dst.copy_from_slice(&convert(px)[..channels]);
        }
    }
}

/// Decode 4x4 blocks left to right, top to bottom.
///
/// Texels past the right or bottom edge are dropped.
fn unpack_blocks<B: FromBytes>(src: &[u8], out: &mut PixelBuffer, decode: impl Fn(&B) -> Tile) -> Result<()> {
    let (width, height) = (out.width(), out.height());
    let mut blocks = BinaryReader::new(src);

    for by in (0..height).step_by(4) {
        for bx in (0..width).step_by(4) {
            let tile = decode(&blocks.read_struct::<B>()?);
            for (i, texel) in tile.iter().enumerate() {
                let (x, y) = (bx + (i % 4) as u32, by + (i / 4) as u32);
                if x < width && y < height {
                    out.put_pixel(x, y, texel);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(format: ImageFormat, width: u32, height: u32, src: &[u8]) -> PixelBuffer {
        let alpha = format.encoding().unwrap().has_alpha();
        let mut out = PixelBuffer::new(width, height, alpha).unwrap();
        let mut reader = BinaryReader::new(src);
        decode_surface(format, &mut reader, &mut out).unwrap();
        assert!(reader.is_empty());
        out
    }

    #[test]
    fn test_rgba8888_copy() {
        let out = decode(ImageFormat::Rgba8888, 1, 1, &[1, 2, 3, 4]);
        assert_eq!(out.pixel(0, 0), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_four_byte_orders() {
        let px = [1, 2, 3, 4];
        assert_eq!(decode(ImageFormat::Abgr8888, 1, 1, &px).pixel(0, 0), &[4, 3, 2, 1]);
        assert_eq!(decode(ImageFormat::Bgra8888, 1, 1, &px).pixel(0, 0), &[3, 2, 1, 4]);
        assert_eq!(decode(ImageFormat::Argb8888, 1, 1, &px).pixel(0, 0), &[4, 1, 2, 3]);
    }

    #[test]
    fn test_three_byte_orders() {
        let px = [10, 20, 30];
        assert_eq!(decode(ImageFormat::Rgb888, 1, 1, &px).pixel(0, 0), &[10, 20, 30]);
        assert_eq!(decode(ImageFormat::Bgr888, 1, 1, &px).pixel(0, 0), &[30, 20, 10]);
    }

    #[test]
    fn test_rgb565() {
        // Pure red, then pure green with 5-bit blue 16.
        let src = [0x00, 0xF8, 0xF0, 0x07];
        let out = decode(ImageFormat::Rgb565, 2, 1, &src);
        assert_eq!(out.pixel(0, 0), &[255, 0, 0]);
        assert_eq!(out.pixel(1, 0), &[0, 255, 132]);
    }

    #[test]
    fn test_luminance_alpha() {
        assert_eq!(decode(ImageFormat::I8, 1, 1, &[77]).pixel(0, 0), &[77, 77, 77]);
        assert_eq!(decode(ImageFormat::Ia88, 1, 1, &[77, 9]).pixel(0, 0), &[77, 77, 77, 9]);
        assert_eq!(decode(ImageFormat::A8, 1, 1, &[9]).pixel(0, 0), &[255, 255, 255, 9]);
    }

    #[test]
    fn test_row_major_through_stride() {
        let src: Vec<u8> = (0..2 * 3 * 3).collect();
        let mut out = PixelBuffer::with_rowstride(2, 3, false, 32).unwrap();
        let mut reader = BinaryReader::new(&src);
        decode_surface(ImageFormat::Rgb888, &mut reader, &mut out).unwrap();

        assert_eq!(out.pixel(0, 0), &[0, 1, 2]);
        assert_eq!(out.pixel(1, 0), &[3, 4, 5]);
        assert_eq!(out.pixel(0, 2), &[12, 13, 14]);
        assert_eq!(&out.pixels()[64..70], &[12, 13, 14, 15, 16, 17]);
        // Padding stays untouched.
        assert!(out.pixels()[6..32].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_dxt1_tiles_in_order() {
        // 8x4: two blocks, the first opaque white, the second transparent.
        let mut src = Vec::new();
        src.extend_from_slice(&[0xFF, 0xFF, 0x00, 0x00, 0, 0, 0, 0]);
        src.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
        let out = decode(ImageFormat::Dxt1, 8, 4, &src);

        assert_eq!(out.pixel(0, 0), &[255, 255, 255, 255]);
        assert_eq!(out.pixel(3, 3), &[255, 255, 255, 255]);
        assert_eq!(out.pixel(4, 0), &[0, 0, 0, 0]);
        assert_eq!(out.pixel(7, 3), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_dxt5_surface() {
        let mut src = vec![255, 0, 0, 0, 0, 0, 0, 0];
        src.extend_from_slice(&[0x1F, 0x00, 0x00, 0x00, 0, 0, 0, 0]);
        let out = decode(ImageFormat::Dxt5, 4, 4, &src);
        assert_eq!(out.pixel(2, 1), &[0, 0, 255, 255]);
    }

    #[test]
    fn test_block_edge_is_clipped() {
        // 2x2 DXT1 consumes a single block and keeps its top-left texels.
        let src = [0xFF, 0xFF, 0x00, 0x00, 0b01_00_01_00, 0, 0, 0];
        let out = decode(ImageFormat::Dxt1, 2, 2, &src);
        assert_eq!(out.pixel(0, 0), &[255, 255, 255, 255]);
        assert_eq!(out.pixel(1, 0), &[0, 0, 0, 255]);
        assert_eq!(out.pixel(0, 1), &[255, 255, 255, 255]);
    }

    #[test]
    fn test_unsupported_format() {
        let mut out = PixelBuffer::new(4, 4, true).unwrap();
        let mut reader = BinaryReader::new(&[0u8; 64]);
        let err = decode_surface(ImageFormat::Dxt3, &mut reader, &mut out).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { tag: 14, .. }));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_truncated_surface() {
        let mut out = PixelBuffer::new(2, 2, true).unwrap();
        let mut reader = BinaryReader::new(&[0u8; 15]);
        let err = decode_surface(ImageFormat::Rgba8888, &mut reader, &mut out).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::CorruptImage);
    }

    #[test]
    fn test_channel_mismatch() {
        let mut out = PixelBuffer::new(1, 1, false).unwrap();
        let mut reader = BinaryReader::new(&[0u8; 4]);
        assert!(matches!(
            decode_surface(ImageFormat::Rgba8888, &mut reader, &mut out),
            Err(Error::BufferMismatch(_))
        ));
    }
}

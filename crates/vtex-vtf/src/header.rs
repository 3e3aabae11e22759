//! VTF header structure.

use log::debug;
use vtex_common::BinaryReader;

use crate::{Error, ImageFormat, Result, VTF_SIGNATURE};

/// VTF file header.
///
/// Layout (little endian, packed):
///
/// ```text
///  0  signature          [u8; 4]  "VTF\0"
///  4  version            [u32; 2] major, minor
/// 12  header_size        u32
/// 16  width, height      u16, u16
/// 20  flags              u32
/// 24  frames             u16
/// 26  first_frame        u16
/// 28  padding            [u8; 4]
/// 32  reflectivity       [f32; 3]
/// 44  padding            [u8; 4]
/// 48  bumpmap_scale      f32
/// 52  high_res_format    i32
/// 56  mipmap_count       u8
/// 57  low_res_format     i32
/// 61  low_res_width      u8
/// 62  low_res_height     u8
/// 63  depth              u16      (7.2+)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VtfHeader {
    /// File signature.
    pub signature: [u8; 4],
    /// Version as (major, minor).
    pub version: [u32; 2],
    /// Declared header size.
    pub header_size: u32,
    /// Width of the largest mipmap.
    pub width: u16,
    /// Height of the largest mipmap.
    pub height: u16,
    /// Texture flags.
    pub flags: u32,
    /// Number of animation frames.
    pub frames: u16,
    /// First frame of the animation.
    pub first_frame: u16,
    /// Reflectivity vector.
    pub reflectivity: [f32; 3],
    /// Bumpmap scale.
    pub bumpmap_scale: f32,
    /// Format of the high-resolution image data.
    pub high_res_format: ImageFormat,
    /// Number of mip levels stored.
    pub mipmap_count: u8,
    /// Format of the thumbnail.
    pub low_res_format: ImageFormat,
    /// Thumbnail width.
    pub low_res_width: u8,
    /// Thumbnail height.
    pub low_res_height: u8,
    /// Depth of the largest mipmap (1 for files older than 7.2).
    pub depth: u16,
}

impl VtfHeader {
    /// Number of bytes a header occupies in the file.
    pub const SIZE: usize = 80;

    /// First version that stores a volume depth.
    pub const VOLUME_VERSION: u32 = 0x0702;

    /// Check if data starts with the VTF signature.
    pub fn is_vtf(data: &[u8]) -> bool {
        data.len() >= VTF_SIGNATURE.len() && &data[..VTF_SIGNATURE.len()] == VTF_SIGNATURE
    }

    /// Parse and validate the header at the start of `data`.
    ///
    /// Fails with a corrupt-image error if the data is shorter than
    /// [`VtfHeader::SIZE`], the signature is wrong, or the frame count, mip
    /// count or base dimensions are zero.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Error::Corrupt(format!(
                "header needs {} bytes, only {} available",
                Self::SIZE,
                data.len()
            )));
        }

        let mut reader = BinaryReader::new(&data[..Self::SIZE]);
        let mut header = Self::read(&mut reader)?;

        if &header.signature != VTF_SIGNATURE {
            return Err(Error::InvalidSignature(header.signature));
        }
        if header.frames == 0 {
            return Err(Error::Corrupt("frame count is zero".into()));
        }
        if header.mipmap_count == 0 {
            return Err(Error::Corrupt("mipmap count is zero".into()));
        }
        if header.width == 0 || header.height == 0 {
            return Err(Error::Corrupt(format!(
                "zero image dimensions {}x{}",
                header.width, header.height
            )));
        }

        // Volume textures only exist from 7.2 onwards; earlier files keep
        // unrelated bytes where the depth would be.
        if !header.has_volume_depth() {
            header.depth = 1;
        }

        debug!(
            "VTF {}.{}: {}x{}x{}, {} frame(s), {} mip(s), format {}",
            header.version[0],
            header.version[1],
            header.width,
            header.height,
            header.depth,
            header.frames,
            header.mipmap_count,
            header.high_res_format
        );

        Ok(header)
    }

    /// Read the raw header fields without validation.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let signature = reader.read_array::<4>()?;
        let version = [reader.read_u32()?, reader.read_u32()?];
        let header_size = reader.read_u32()?;
        let width = reader.read_u16()?;
        let height = reader.read_u16()?;
        let flags = reader.read_u32()?;
        let frames = reader.read_u16()?;
        let first_frame = reader.read_u16()?;
        reader.skip(4)?;
        let reflectivity = [reader.read_f32()?, reader.read_f32()?, reader.read_f32()?];
        reader.skip(4)?;
        let bumpmap_scale = reader.read_f32()?;
        let high_res_format = ImageFormat::from(reader.read_i32()?);
        let mipmap_count = reader.read_u8()?;
        let low_res_format = ImageFormat::from(reader.read_i32()?);
        let low_res_width = reader.read_u8()?;
        let low_res_height = reader.read_u8()?;
        let depth = reader.read_u16()?;

        Ok(Self {
            signature,
            version,
            header_size,
            width,
            height,
            flags,
            frames,
            first_frame,
            reflectivity,
            bumpmap_scale,
            high_res_format,
            mipmap_count,
            low_res_format,
            low_res_width,
            low_res_height,
            depth,
        })
    }

    /// Combined version number (`major * 256 + minor`).
    pub fn version(&self) -> u32 {
        self.version[0]
            .saturating_mul(256)
            .saturating_add(self.version[1])
    }

    /// Whether this file version stores a volume depth.
    pub fn has_volume_depth(&self) -> bool {
        self.version() >= Self::VOLUME_VERSION
    }

    /// Whether the high-resolution frames decode with an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.high_res_format
            .encoding()
            .is_some_and(|encoding| encoding.has_alpha())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(version: [u32; 2], frames: u16, depth: u16) -> Vec<u8> {
        let mut data = vec![0u8; VtfHeader::SIZE];
        data[0..4].copy_from_slice(b"VTF\0");
        data[4..8].copy_from_slice(&version[0].to_le_bytes());
        data[8..12].copy_from_slice(&version[1].to_le_bytes());
        data[12..16].copy_from_slice(&80u32.to_le_bytes());
        data[16..18].copy_from_slice(&256u16.to_le_bytes());
        data[18..20].copy_from_slice(&128u16.to_le_bytes());
        data[24..26].copy_from_slice(&frames.to_le_bytes());
        data[48..52].copy_from_slice(&1.0f32.to_le_bytes());
        data[52..56].copy_from_slice(&13i32.to_le_bytes());
        data[56] = 9;
        data[57..61].copy_from_slice(&(-1i32).to_le_bytes());
        data[61] = 16;
        data[62] = 8;
        data[63..65].copy_from_slice(&depth.to_le_bytes());
        data
    }

    #[test]
    fn test_parse_fields() {
        let header = VtfHeader::parse(&header_bytes([7, 2], 3, 4)).unwrap();

        assert_eq!(header.version(), 0x0702);
        assert_eq!(header.header_size, 80);
        assert_eq!(header.width, 256);
        assert_eq!(header.height, 128);
        assert_eq!(header.frames, 3);
        assert_eq!(header.bumpmap_scale, 1.0);
        assert_eq!(header.high_res_format, ImageFormat::Dxt1);
        assert_eq!(header.mipmap_count, 9);
        assert_eq!(header.low_res_format, ImageFormat::None);
        assert_eq!(header.low_res_width, 16);
        assert_eq!(header.low_res_height, 8);
        assert_eq!(header.depth, 4);
        assert!(header.has_alpha());
    }

    #[test]
    fn test_depth_forced_before_7_2() {
        let header = VtfHeader::parse(&header_bytes([7, 1], 1, 4)).unwrap();
        assert_eq!(header.depth, 1);
        assert!(!header.has_volume_depth());
    }

    #[test]
    fn test_rejects_bad_signature() {
        let mut data = header_bytes([7, 2], 1, 1);
        data[0] = b'X';
        assert!(matches!(
            VtfHeader::parse(&data),
            Err(Error::InvalidSignature(sig)) if &sig == b"XTF\0"
        ));
    }

    #[test]
    fn test_rejects_zero_frames() {
        let data = header_bytes([7, 2], 0, 1);
        assert!(matches!(VtfHeader::parse(&data), Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_rejects_zero_mipmaps() {
        let mut data = header_bytes([7, 2], 1, 1);
        data[56] = 0;
        let err = VtfHeader::parse(&data).unwrap_err();
        assert!(matches!(err, Error::Corrupt(_)));
        assert_eq!(err.kind(), crate::ErrorKind::CorruptImage);
    }

    #[test]
    fn test_rejects_truncated_header() {
        let data = header_bytes([7, 2], 1, 1);
        let err = VtfHeader::parse(&data[..64]).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::CorruptImage);
    }

    #[test]
    fn test_is_vtf() {
        assert!(VtfHeader::is_vtf(b"VTF\0rest"));
        assert!(!VtfHeader::is_vtf(b"VTF"));
        assert!(!VtfHeader::is_vtf(b"DDS |"));
    }
}

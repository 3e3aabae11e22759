//! Mip chain and volume addressing.
//!
//! High-resolution data is stored smallest mip first. Within one mip level
//! every frame is stored in turn, each frame holding its faces, each face
//! holding its depth slices:
//!
//! ```text
//! for mip in (0..mipmap_count).rev()
//!     for frame in 0..frames
//!         for face in 0..faces
//!             for slice in 0..mip_depth
//!                 surface
//! ```

use crate::{Error, Result, VtfHeader};

/// Faces per frame. Cube maps are not iterated, so only face 0 exists.
pub const FACE_COUNT: u64 = 1;

/// Mip level selector for [`offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipLevel {
    /// A single mip level, 0 being full resolution.
    Level(u32),
    /// The whole mip chain; used to size the full payload.
    All,
}

/// Extent of a dimension at `level`, floored at 1.
#[inline]
pub fn mip_extent(extent: u32, level: u32) -> u32 {
    extent.checked_shr(level).unwrap_or(0).max(1)
}

/// Byte size of one mip level holding `depth` slices at level 0.
///
/// `depth` is shifted along with width and height, so passing the header
/// depth sizes a whole volume and passing 1 sizes a single slice. Formats
/// without a decoder have size 0.
pub fn mip_size(header: &VtfHeader, level: u32, depth: u32) -> u64 {
    let Some(encoding) = header.high_res_format.encoding() else {
        return 0;
    };

    let width = mip_extent(u32::from(header.width), level);
    let height = mip_extent(u32::from(header.height), level);
    let depth = mip_extent(depth, level);

    encoding
        .surface_size(width, height)
        .saturating_mul(u64::from(depth))
}

/// Byte offset of a surface relative to the start of the high-resolution data.
///
/// With [`MipLevel::All`] the result is the size of the whole payload
/// (`frames` times one full mip chain).
pub fn offset(header: &VtfHeader, frame: u32, face: u32, slice: u32, mip: MipLevel) -> u64 {
    let depth = u32::from(header.depth);
    let first_coarser = match mip {
        MipLevel::Level(level) => level.saturating_add(1),
        MipLevel::All => 0,
    };

    // Every coarser level precedes the requested one, for all frames.
    let coarser: u64 = (first_coarser..u32::from(header.mipmap_count))
        .map(|level| mip_size(header, level, depth))
        .fold(0u64, u64::saturating_add);
    let mut offset = coarser.saturating_mul(u64::from(header.frames) * FACE_COUNT);

    if let MipLevel::Level(level) = mip {
        let volume_bytes = mip_size(header, level, depth);
        let slice_bytes = mip_size(header, level, 1);
        let surface = u64::from(frame) * FACE_COUNT + u64::from(face);

        offset = offset
            .saturating_add(volume_bytes.saturating_mul(surface))
            .saturating_add(slice_bytes.saturating_mul(u64::from(slice)));
    }

    offset
}

/// Total size of the high-resolution payload.
pub fn high_res_size(header: &VtfHeader) -> u64 {
    offset(header, 0, 0, 0, MipLevel::All)
}

/// Position of the high-resolution payload inside a file of `file_len` bytes.
///
/// The payload is the last region of the file, so it starts at
/// `file_len - high_res_size`.
pub fn high_res_start(header: &VtfHeader, file_len: usize) -> Result<usize> {
    let total = high_res_size(header);
    usize::try_from(total)
        .ok()
        .and_then(|total| file_len.checked_sub(total))
        .ok_or_else(|| {
            Error::Corrupt(format!(
                "image data needs {} bytes but the file holds {}",
                total, file_len
            ))
        })
}

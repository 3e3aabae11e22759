//! Valve Texture Format (VTF) decoding.
//!
//! A VTF file holds an 80-byte header, an optional low-resolution thumbnail
//! and the high-resolution image data: a mip chain, stored smallest level
//! first, for every animation frame. This crate decodes the full-resolution
//! level of every frame into 8-bit RGB or RGBA pixel buffers.
//!
//! Supported high-resolution formats are RGBA8888, ABGR8888, RGB888, BGR888,
//! RGB565, I8, IA88, A8, ARGB8888, BGRA8888, DXT1 and DXT5.
//!
//! # Example
//!
//! ```no_run
//! use vtex_vtf::load_file;
//!
//! let animation = load_file("materials/sprays/logo.vtf")?;
//! for frame in &animation {
//!     println!("{}x{} alpha={}", frame.width(), frame.height(), frame.has_alpha());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod accumulator;
mod animation;
mod error;
mod format;
mod header;
mod loader;
mod pixbuf;

pub mod block;
pub mod decode;
pub mod layout;

pub use accumulator::{Accumulator, INITIAL_CAPACITY};
pub use animation::{Animation, DefaultSink, ImageSink, FRAME_DELAY};
pub use error::{Error, ErrorKind, Result};
pub use format::{Encoding, ImageFormat};
pub use header::VtfHeader;
pub use layout::{high_res_size, mip_size, offset, MipLevel};
pub use loader::{decode_file, load_bytes, load_file, load_reader, LoaderOptions, VtfLoader};
pub use pixbuf::PixelBuffer;

/// VTF file signature ("VTF\0").
pub const VTF_SIGNATURE: &[u8; 4] = b"VTF\0";

/// Registration details for image loading frameworks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Short format name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// MIME types served by this decoder.
    pub mime_types: &'static [&'static str],
    /// File extensions, without the dot.
    pub extensions: &'static [&'static str],
    /// Leading bytes that identify the format.
    pub signature: &'static [u8],
    /// License of the decoder.
    pub license: &'static str,
}

/// Registration details of the VTF decoder.
pub const FORMAT_INFO: FormatInfo = FormatInfo {
    name: "vtf",
    description: "Valve Texture format",
    mime_types: &["image/x-vtf"],
    extensions: &["vtf"],
    signature: VTF_SIGNATURE,
    license: "MIT",
};

/// Check if data starts with the VTF signature.
pub fn is_vtf(data: &[u8]) -> bool {
    VtfHeader::is_vtf(data)
}

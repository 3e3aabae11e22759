//! vtex - Valve Texture Format decoding library.
//!
//! This crate provides a unified interface to the vtex crates.
//!
//! # Crates
//!
//! - [`vtex_common`] - Common utilities (bounds-checked binary reading)
//! - [`vtex_vtf`] - VTF header parsing, mip addressing and pixel decoding
//!
//! # Example
//!
//! ```no_run
//! use vtex::prelude::*;
//!
//! let data = std::fs::read("materials/sprays/logo.vtf")?;
//!
//! if is_vtf(&data) {
//!     let header = VtfHeader::parse(&data)?;
//!     println!("{}x{} {}", header.width, header.height, header.high_res_format);
//!
//!     let animation = load_bytes(&data)?;
//!     println!("Frames: {}", animation.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use vtex_common as common;
pub use vtex_vtf as vtf;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use vtex_common::BinaryReader;
    pub use vtex_vtf::{
        is_vtf, load_bytes, load_file, load_reader, Animation, DefaultSink, ImageFormat, ImageSink,
        LoaderOptions, MipLevel, PixelBuffer, VtfHeader, VtfLoader, FORMAT_INFO,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

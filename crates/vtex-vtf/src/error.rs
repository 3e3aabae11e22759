//! Error types for VTF loading.

use thiserror::Error;

/// Errors that can occur while loading a VTF file.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading from a byte source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error (out-of-bounds read).
    #[error("{0}")]
    Common(#[from] vtex_common::Error),

    /// Buffer growth or pixel buffer allocation failed.
    #[error("not enough memory: failed to allocate {requested} bytes")]
    OutOfMemory { requested: usize },

    /// Invalid VTF signature.
    #[error("invalid VTF signature: expected 'VTF\\0', got {0:?}")]
    InvalidSignature([u8; 4]),

    /// File contents are corrupt or incomplete.
    #[error("file corrupt or incomplete: {0}")]
    Corrupt(String),

    /// High-resolution image format has no decoder.
    #[error("unsupported VTF format {name} ({tag})")]
    UnsupportedFormat { tag: i32, name: &'static str },

    /// A sink-provided pixel buffer does not fit the frame.
    #[error("pixel buffer mismatch: {0}")]
    BufferMismatch(String),
}

/// Coarse classification of a load failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Allocation failed.
    OutOfMemory,
    /// Bad signature, zero frames, truncated header or payload.
    CorruptImage,
    /// The pixel format tag has no decoder.
    UnsupportedFormat,
}

impl Error {
    /// Classify this error into one of the three load failure kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            Error::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Error::Io(_)
            | Error::Common(_)
            | Error::InvalidSignature(_)
            | Error::Corrupt(_)
            | Error::BufferMismatch(_) => ErrorKind::CorruptImage,
        }
    }
}

/// Result type for VTF operations.
pub type Result<T> = std::result::Result<T, Error>;

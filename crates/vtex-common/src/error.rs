//! Error types for vtex-common.

use thiserror::Error;

/// Common error type for vtex reading operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Seek target lies past the end of the buffer.
    #[error("offset {offset} out of bounds (buffer length: {len})")]
    OffsetOutOfBounds { offset: usize, len: usize },
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

//! Still image encoding
//!
//! Cached frames are stored already encoded so readers never pay for
//! encoding. The format is fixed per encoder; the default is JPEG.

pub mod jpeg;

use std::fmt;

use bytes::Bytes;

use crate::source::RawFrame;

pub use jpeg::JpegEncoder;

/// Encodes decoded frames into a still image format
pub trait StillEncoder: Send + Sync + 'static {
    /// MIME type of the produced images
    fn content_type(&self) -> &'static str;

    /// Encode one frame
    fn encode(&self, frame: &RawFrame) -> Result<Bytes, EncodeError>;
}

/// Still image encoding failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Pixel buffer does not match the frame dimensions
    BufferSize { expected: usize, actual: usize },
    /// Frame has a zero dimension
    EmptyFrame,
    /// Codec rejected the frame
    Codec(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::BufferSize { expected, actual } => write!(
                f,
                "Pixel buffer size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
            EncodeError::EmptyFrame => write!(f, "Frame has no pixels"),
            EncodeError::Codec(reason) => write!(f, "Codec error: {}", reason),
        }
    }
}

impl std::error::Error for EncodeError {}

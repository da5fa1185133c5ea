//! Frame sources
//!
//! The core never decodes video itself. It talks to a transport/codec
//! collaborator through two traits:
//!
//! - [`Transport`] opens a connection for a [`ConnectTarget`]
//! - [`FrameSource`] is the open connection: it reads decoded frames and is
//!   closed exactly once by its owner
//!
//! Both are blocking. Stream workers call them from tokio's blocking pool,
//! so implementations are free to wait on the network.
//!
//! Provided implementations:
//! - [`SyntheticTransport`] for `stub://` addresses (demos and tests)
//! - `GstTransport` for real RTSP, behind the `rtsp-gstreamer` feature
//! - [`DefaultTransport`] which routes between the two by scheme

pub mod route;
pub mod synthetic;

#[cfg(feature = "rtsp-gstreamer")]
pub mod gstreamer;

use std::fmt;

use crate::camera::{ConnectTarget, Resolution};

pub use route::DefaultTransport;
pub use synthetic::SyntheticTransport;

#[cfg(feature = "rtsp-gstreamer")]
pub use self::gstreamer::GstTransport;

/// A decoded frame as packed 8-bit RGB
#[derive(Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Row-major RGB bytes, `width * height * 3` long
    pub pixels: Vec<u8>,
}

impl RawFrame {
    /// Create a frame from packed RGB pixels
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Number of bytes a complete frame of this size holds
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    /// Whether the pixel buffer matches the frame dimensions
    pub fn is_complete(&self) -> bool {
        self.pixels.len() == self.expected_len()
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Decoder hints applied after a connection opens
///
/// Best effort: a source may ignore any of them, and nobody checks whether
/// they took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHints {
    /// Requested decode resolution
    pub resolution: Resolution,
    /// Requested sample rate
    pub fps: u32,
}

/// An open connection producing decoded frames
///
/// Implementations must release the connection on drop if `close` was never
/// called. A source can be dropped unclosed when the task opening or reading
/// it is cancelled or panics.
pub trait FrameSource: Send + 'static {
    /// Apply decoder hints. The default ignores them.
    fn apply_hints(&mut self, hints: &StreamHints) {
        let _ = hints;
    }

    /// Block until the next frame is decoded
    ///
    /// Errors are treated as transient by the caller: the connection stays
    /// open and the read is retried later.
    fn read_frame(&mut self) -> Result<RawFrame, SourceError>;

    /// Release the connection. Must be idempotent.
    fn close(&mut self);
}

/// Opens connections
pub trait Transport: Send + Sync + 'static {
    /// Open a connection to `target`
    fn open(&self, target: &ConnectTarget) -> Result<Box<dyn FrameSource>, SourceError>;
}

/// Transport or decoder failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Connection could not be opened
    Open(String),
    /// No scheme handler for this address
    UnsupportedScheme(String),
    /// No frame arrived within the read timeout
    Timeout,
    /// Stream ended
    EndOfStream,
    /// Frame arrived but could not be decoded
    Decode(String),
    /// Source was already closed
    Closed,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Open(reason) => write!(f, "Failed to open stream: {}", reason),
            SourceError::UnsupportedScheme(scheme) => {
                write!(f, "Unsupported stream scheme: {}", scheme)
            }
            SourceError::Timeout => write!(f, "Timed out waiting for frame"),
            SourceError::EndOfStream => write!(f, "End of stream"),
            SourceError::Decode(reason) => write!(f, "Failed to decode frame: {}", reason),
            SourceError::Closed => write!(f, "Source is closed"),
        }
    }
}

impl std::error::Error for SourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_frame_complete() {
        let frame = RawFrame::new(2, 2, vec![0; 12]);
        assert!(frame.is_complete());

        let short = RawFrame::new(2, 2, vec![0; 11]);
        assert!(!short.is_complete());
        assert_eq!(short.expected_len(), 12);
    }

    #[test]
    fn test_raw_frame_debug_omits_pixels() {
        let frame = RawFrame::new(4, 4, vec![7; 48]);
        assert_eq!(
            format!("{:?}", frame),
            "RawFrame { width: 4, height: 4, bytes: 48 }"
        );
    }
}

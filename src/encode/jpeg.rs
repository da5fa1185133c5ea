//! JPEG encoding via the `image` crate

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
use image::ExtendedColorType;

use crate::source::RawFrame;

use super::{EncodeError, StillEncoder};

/// Default JPEG quality (1-100)
pub const DEFAULT_QUALITY: u8 = 80;

/// Baseline JPEG encoder for RGB frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegEncoder {
    quality: u8,
}

impl JpegEncoder {
    /// Create an encoder with the default quality
    pub fn new() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
        }
    }

    /// Create an encoder with the given quality, clamped to 1-100
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    /// Configured quality
    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StillEncoder for JpegEncoder {
    fn content_type(&self) -> &'static str {
        "image/jpeg"
    }

    fn encode(&self, frame: &RawFrame) -> Result<Bytes, EncodeError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(EncodeError::EmptyFrame);
        }
        if !frame.is_complete() {
            return Err(EncodeError::BufferSize {
                expected: frame.expected_len(),
                actual: frame.pixels.len(),
            });
        }

        let mut out = Vec::with_capacity(frame.pixels.len() / 8);
        {
            let mut encoder = ImageJpegEncoder::new_with_quality(&mut out, self.quality);
            encoder
                .encode(
                    &frame.pixels,
                    frame.width,
                    frame.height,
                    ExtendedColorType::Rgb8,
                )
                .map_err(|e| EncodeError::Codec(e.to_string()))?;
        }

        Ok(Bytes::from(out))
    }
}

//! Synthetic frame source for `stub://` addresses
//!
//! Produces generated RGB frames without touching the network. Useful for
//! demos and tests. A host starting with `fail` (e.g. `stub://fail`) refuses
//! to open, which mimics an unreachable camera.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::camera::{ConnectTarget, Resolution};

use super::{FrameSource, RawFrame, SourceError, StreamHints, Transport};

/// Scheme handled by [`SyntheticTransport`]
pub const SCHEME: &str = "stub";

const DEFAULT_SIZE: Resolution = Resolution::new(640, 480);

/// Transport producing generated frames
///
/// Tracks how many of its connections are currently open.
#[derive(Debug, Clone, Default)]
pub struct SyntheticTransport {
    open: Arc<AtomicUsize>,
}

impl SyntheticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of connections opened and not yet closed
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

impl Transport for SyntheticTransport {
    fn open(&self, target: &ConnectTarget) -> Result<Box<dyn FrameSource>, SourceError> {
        if target.scheme() != SCHEME {
            return Err(SourceError::UnsupportedScheme(target.scheme().to_string()));
        }

        let host = target.url().host_str().unwrap_or_default();
        if host.starts_with("fail") {
            return Err(SourceError::Open(format!("{} is unreachable", target)));
        }

        self.open.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(target = %target, "Synthetic source opened");

        Ok(Box::new(SyntheticSource {
            open: Arc::clone(&self.open),
            size: DEFAULT_SIZE,
            frame_count: 0,
            closed: false,
        }))
    }
}

struct SyntheticSource {
    open: Arc<AtomicUsize>,
    size: Resolution,
    frame_count: u64,
    closed: bool,
}

impl SyntheticSource {
    /// Diagonal gradient that drifts one step per frame
    fn generate_pixels(&self) -> Vec<u8> {
        let Resolution { width, height } = self.size;
        let shift = self.frame_count as usize;
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);

        for y in 0..height as usize {
            for x in 0..width as usize {
                let v = ((x + y + shift) % 256) as u8;
                pixels.extend_from_slice(&[v, v.wrapping_add(85), v.wrapping_add(170)]);
            }
        }

        pixels
    }
}

impl FrameSource for SyntheticSource {
    fn apply_hints(&mut self, hints: &StreamHints) {
        if hints.resolution.width > 0 && hints.resolution.height > 0 {
            self.size = hints.resolution;
        }
    }

    fn read_frame(&mut self) -> Result<RawFrame, SourceError> {
        if self.closed {
            return Err(SourceError::Closed);
        }

        self.frame_count += 1;
        Ok(RawFrame::new(
            self.size.width,
            self.size.height,
            self.generate_pixels(),
        ))
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.open.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for SyntheticSource {
    fn drop(&mut self) {
        self.close();
    }
}

//! Latest-frame slot
//!
//! Each worker keeps exactly one encoded frame. The poll loop replaces it
//! wholesale under the slot mutex, so a reader sees either the previous
//! frame or the new one, never a mix. `Bytes` makes the copy handed to
//! readers a reference-count bump.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use bytes::Bytes;

/// The most recent successfully encoded frame of a stream
#[derive(Debug, Clone)]
pub struct CachedFrame {
    /// Encoded image (JPEG by default)
    pub data: Bytes,
    /// Sequence number of the read that produced this frame (1-based)
    pub sequence: u64,
    /// Decoded width in pixels
    pub width: u32,
    /// Decoded height in pixels
    pub height: u32,
    /// When the frame was stored
    pub captured_at: Instant,
}

impl CachedFrame {
    /// Time since the frame was stored
    pub fn age(&self) -> Duration {
        self.captured_at.elapsed()
    }

    /// Encoded size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the encoded image is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Default)]
struct SlotInner {
    frame: Option<CachedFrame>,
    sealed: bool,
}

/// Mutex-guarded single-frame cache
///
/// Once sealed, stores are refused; the last frame stays readable.
#[derive(Debug, Default)]
pub(crate) struct FrameSlot {
    inner: Mutex<SlotInner>,
}

impl FrameSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotInner> {
        // The critical sections never panic mid-update, so a poisoned
        // slot still holds a whole frame.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the cached frame; false if the slot is sealed
    pub(crate) fn store(&self, frame: CachedFrame) -> bool {
        let mut inner = self.lock();
        if inner.sealed {
            return false;
        }
        inner.frame = Some(frame);
        true
    }

    pub(crate) fn load(&self) -> Option<CachedFrame> {
        self.lock().frame.clone()
    }

    /// Refuse all further stores
    pub(crate) fn seal(&self) {
        self.lock().sealed = true;
    }

    pub(crate) fn last_age(&self) -> Option<Duration> {
        self.lock().frame.as_ref().map(CachedFrame::age)
    }
}

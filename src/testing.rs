//! Test doubles shared by the unit tests

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::camera::ConnectTarget;
use crate::encode::{EncodeError, StillEncoder};
use crate::source::{FrameSource, RawFrame, SourceError, StreamHints, Transport};
use crate::worker::{CachedFrame, StreamWorker};

#[derive(Default)]
struct MockState {
    open: AtomicUsize,
    closes: AtomicUsize,
    frames: AtomicU64,
    unhealthy: AtomicBool,
    panicking: AtomicBool,
    read_delay_ms: AtomicU64,
    opened: Mutex<Vec<String>>,
    hints: Mutex<Vec<StreamHints>>,
}

/// Transport whose sources produce tiny uniform frames
///
/// Hosts starting with `fail` refuse to open. Reads can be switched to fail
/// or to block for a while, for every source at once.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn open_connections(&self) -> usize {
        self.state.open.load(Ordering::SeqCst)
    }

    pub(crate) fn total_closes(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn opened_targets(&self) -> Vec<String> {
        self.state.opened.lock().unwrap().clone()
    }

    pub(crate) fn applied_hints(&self) -> Vec<StreamHints> {
        self.state.hints.lock().unwrap().clone()
    }

    /// Make every read fail (simulated network drop) or succeed again
    pub(crate) fn set_healthy(&self, healthy: bool) {
        self.state.unhealthy.store(!healthy, Ordering::SeqCst);
    }

    /// Make every read panic
    pub(crate) fn set_panicking(&self, panicking: bool) {
        self.state.panicking.store(panicking, Ordering::SeqCst);
    }

    /// Make every read block for `delay` before returning
    pub(crate) fn set_read_delay(&self, delay: Duration) {
        self.state
            .read_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Transport for MockTransport {
    fn open(&self, target: &ConnectTarget) -> Result<Box<dyn FrameSource>, SourceError> {
        let host = target.url().host_str().unwrap_or_default();
        if host.starts_with("fail") {
            return Err(SourceError::Open("connection refused".into()));
        }

        self.state.open.fetch_add(1, Ordering::SeqCst);
        self.state
            .opened
            .lock()
            .unwrap()
            .push(target.as_str().to_string());

        Ok(Box::new(MockSource {
            state: Arc::clone(&self.state),
            closed: false,
        }))
    }
}

struct MockSource {
    state: Arc<MockState>,
    closed: bool,
}

impl FrameSource for MockSource {
    fn apply_hints(&mut self, hints: &StreamHints) {
        self.state.hints.lock().unwrap().push(*hints);
    }

    fn read_frame(&mut self) -> Result<RawFrame, SourceError> {
        let delay = self.state.read_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            std::thread::sleep(Duration::from_millis(delay));
        }
        if self.closed {
            return Err(SourceError::Closed);
        }
        if self.state.panicking.load(Ordering::SeqCst) {
            panic!("decoder crashed");
        }
        if self.state.unhealthy.load(Ordering::SeqCst) {
            return Err(SourceError::Timeout);
        }

        let n = self.state.frames.fetch_add(1, Ordering::SeqCst);
        let fill = (n % 250) as u8 + 1;
        Ok(RawFrame::new(4, 4, vec![fill; 48]))
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.state.open.fetch_sub(1, Ordering::SeqCst);
            self.state.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Drop for MockSource {
    fn drop(&mut self) {
        self.close();
    }
}

/// Encoder emitting 1 KiB filled with the frame's first pixel byte
///
/// A torn read would show up as mixed bytes.
#[derive(Clone, Default)]
pub(crate) struct PatternEncoder {
    failing: Arc<AtomicBool>,
}

impl PatternEncoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl StillEncoder for PatternEncoder {
    fn content_type(&self) -> &'static str {
        "application/x-pattern"
    }

    fn encode(&self, frame: &RawFrame) -> Result<Bytes, EncodeError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EncodeError::Codec("forced failure".into()));
        }
        Ok(Bytes::from(vec![frame.pixels[0]; 1024]))
    }
}

/// Whether every byte of the frame is the same
pub(crate) fn is_uniform(frame: &CachedFrame) -> bool {
    frame.data.iter().all(|b| *b == frame.data[0])
}

/// Poll until the worker caches a frame with at least `min_sequence`
pub(crate) async fn wait_for_frame(worker: &StreamWorker, min_sequence: u64) -> CachedFrame {
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Some(frame) = worker.cached_frame() {
            if frame.sequence >= min_sequence {
                return frame;
            }
        }
        assert!(
            Instant::now() < deadline,
            "no frame with sequence >= {} from {}",
            min_sequence,
            worker.id()
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Poll until `check` holds, for up to three seconds
pub(crate) async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

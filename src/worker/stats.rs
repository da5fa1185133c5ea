//! Statistics for stream workers

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::state::WorkerState;

/// Snapshot of a worker's counters
#[derive(Debug, Clone)]
pub struct WorkerStats {
    /// Current worker state
    pub state: WorkerState,
    /// Successful reads
    pub frames_decoded: u64,
    /// Failed reads
    pub read_failures: u64,
    /// Frames read but not encoded
    pub encode_failures: u64,
    /// Failed reads since the last successful one
    pub consecutive_failures: u32,
    /// Time since the worker connected
    pub uptime: Duration,
    /// Age of the cached frame, if any
    pub last_frame_age: Option<Duration>,
}

impl WorkerStats {
    /// Average successful reads per second since connect
    pub fn effective_fps(&self) -> f64 {
        let secs = self.uptime.as_secs_f64();
        if secs > 0.0 {
            self.frames_decoded as f64 / secs
        } else {
            0.0
        }
    }

    /// Whether any frame has been cached yet
    pub fn has_frame(&self) -> bool {
        self.last_frame_age.is_some()
    }
}

/// Live counters updated by the poll loop
#[derive(Debug)]
pub(crate) struct StatsCounters {
    started_at: Instant,
    frames_decoded: AtomicU64,
    read_failures: AtomicU64,
    encode_failures: AtomicU64,
    consecutive_failures: AtomicU32,
}

impl StatsCounters {
    pub(crate) fn new() -> Self {
        Self {
            started_at: Instant::now(),
            frames_decoded: AtomicU64::new(0),
            read_failures: AtomicU64::new(0),
            encode_failures: AtomicU64::new(0),
            consecutive_failures: AtomicU32::new(0),
        }
    }

    /// Count a successful read; returns its sequence number (1-based)
    pub(crate) fn record_frame(&self) -> u64 {
        self.consecutive_failures.store(0, Ordering::Relaxed);
        self.frames_decoded.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Count a failed read; returns the current failure streak
    pub(crate) fn record_read_failure(&self) -> u32 {
        self.read_failures.fetch_add(1, Ordering::Relaxed);
        self.consecutive_failures
            .fetch_add(1, Ordering::Relaxed)
            .saturating_add(1)
    }

    pub(crate) fn record_encode_failure(&self) {
        self.encode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(
        &self,
        state: WorkerState,
        last_frame_age: Option<Duration>,
    ) -> WorkerStats {
        WorkerStats {
            state,
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            read_failures: self.read_failures.load(Ordering::Relaxed),
            encode_failures: self.encode_failures.load(Ordering::Relaxed),
            consecutive_failures: self.consecutive_failures.load(Ordering::Relaxed),
            uptime: self.started_at.elapsed(),
            last_frame_age,
        }
    }
}

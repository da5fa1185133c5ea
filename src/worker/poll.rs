//! Background acquisition loop
//!
//! One loop per worker. Each iteration moves the connection into the
//! blocking pool, reads and encodes a frame there, and gets the connection
//! back. Failed reads never end the loop: they are counted and retried after
//! a fixed backoff. The loop owns the connection and closes it exactly once,
//! on exit, after its last read has returned.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::sync::watch;

use crate::encode::{EncodeError, StillEncoder};
use crate::source::{FrameSource, SourceError};

use super::config::WorkerConfig;
use super::slot::CachedFrame;
use super::state::WorkerState;
use super::stream::Shared;

enum ReadOutcome {
    Frame {
        width: u32,
        height: u32,
        encoded: Result<Bytes, EncodeError>,
    },
    Failed(SourceError),
}

fn read_and_encode(source: &mut dyn FrameSource, encoder: &dyn StillEncoder) -> ReadOutcome {
    match source.read_frame() {
        Ok(frame) => ReadOutcome::Frame {
            width: frame.width,
            height: frame.height,
            encoded: encoder.encode(&frame),
        },
        Err(e) => ReadOutcome::Failed(e),
    }
}

pub(super) struct PollLoop {
    id: String,
    encoder: Arc<dyn StillEncoder>,
    shared: Arc<Shared>,
    running: watch::Receiver<bool>,
    interval: Duration,
    backoff: Duration,
    degrade_after: Option<u32>,
}

impl PollLoop {
    pub(super) fn new(
        id: String,
        encoder: Arc<dyn StillEncoder>,
        shared: Arc<Shared>,
        running: watch::Receiver<bool>,
        interval: Duration,
        settings: &WorkerConfig,
    ) -> Self {
        Self {
            id,
            encoder,
            shared,
            running,
            interval,
            backoff: settings.read_backoff,
            degrade_after: settings.degrade_after,
        }
    }

    fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    /// Sleep for `delay`, waking early on stop. Returns whether to continue.
    async fn pause(&mut self, delay: Duration) -> bool {
        let stopped = tokio::select! {
            _ = tokio::time::sleep(delay) => false,
            _ = self.running.wait_for(|running| !*running) => true,
        };
        !stopped && self.is_running()
    }

    pub(super) async fn run(mut self, mut source: Box<dyn FrameSource>) {
        tracing::debug!(stream = %self.id, "Poll loop started");

        while self.is_running() {
            let encoder = Arc::clone(&self.encoder);
            let joined = tokio::task::spawn_blocking(move || {
                let outcome = read_and_encode(&mut *source, &*encoder);
                (source, outcome)
            })
            .await;

            let outcome = match joined {
                Ok((returned, outcome)) => {
                    source = returned;
                    outcome
                }
                Err(e) => {
                    // Unwinding dropped the source, which released the connection.
                    tracing::error!(stream = %self.id, error = %e, "Frame read panicked");
                    self.shared.state.set(WorkerState::Stopped);
                    return;
                }
            };

            // Stop may have been requested while the read was in flight.
            if !self.is_running() {
                break;
            }

            let delay = match outcome {
                ReadOutcome::Frame {
                    width,
                    height,
                    encoded,
                } => {
                    self.on_frame(width, height, encoded);
                    self.interval
                }
                ReadOutcome::Failed(e) => {
                    self.on_read_failure(&e);
                    self.backoff
                }
            };

            if !self.pause(delay).await {
                break;
            }
        }

        match tokio::task::spawn_blocking(move || source.close()).await {
            Ok(()) => tracing::debug!(stream = %self.id, "Connection released"),
            Err(e) => tracing::warn!(stream = %self.id, error = %e, "Connection close panicked"),
        }
        self.shared.state.set(WorkerState::Stopped);
    }

    fn on_frame(&self, width: u32, height: u32, encoded: Result<Bytes, EncodeError>) {
        let sequence = self.shared.counters.record_frame();

        if self
            .shared
            .state
            .transition(WorkerState::Degraded, WorkerState::Running)
        {
            tracing::info!(stream = %self.id, "Stream recovered");
        }

        match encoded {
            Ok(data) => {
                let frame = CachedFrame {
                    data,
                    sequence,
                    width,
                    height,
                    captured_at: Instant::now(),
                };
                let bytes = frame.len();
                if self.shared.slot.store(frame) {
                    tracing::trace!(stream = %self.id, sequence, bytes, "Frame cached");
                }
            }
            Err(e) => {
                // Keep serving the previous frame.
                self.shared.counters.record_encode_failure();
                tracing::debug!(stream = %self.id, sequence, error = %e, "Frame encode failed");
            }
        }
    }

    fn on_read_failure(&self, error: &SourceError) {
        let streak = self.shared.counters.record_read_failure();

        if streak == 1 {
            tracing::debug!(
                stream = %self.id,
                error = %error,
                retry_ms = self.backoff.as_millis() as u64,
                "Frame read failed, retrying"
            );
        } else {
            tracing::trace!(stream = %self.id, streak, error = %error, "Frame read failed");
        }

        if let Some(limit) = self.degrade_after {
            if streak >= limit
                && self
                    .shared
                    .state
                    .transition(WorkerState::Running, WorkerState::Degraded)
            {
                tracing::warn!(
                    stream = %self.id,
                    consecutive_failures = streak,
                    error = %error,
                    "Stream degraded, still retrying"
                );
            }
        }
    }
}

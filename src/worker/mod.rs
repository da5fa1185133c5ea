//! Stream workers
//!
//! A worker owns one camera connection and a background loop that keeps the
//! camera's latest frame cached as an encoded still image.
//!
//! # Architecture
//!
//! ```text
//!        StreamWorker                         poll loop (tokio task)
//!  ┌──────────────────────┐           ┌──────────────────────────────┐
//!  │ running: watch::Tx ──┼──────────►│ running: watch::Rx           │
//!  │ task: JoinHandle     │           │ source: Box<dyn FrameSource> │
//!  │ shared ──────────────┼──┐        │   │                          │
//!  └──────────────────────┘  │        │   ▼ spawn_blocking           │
//!                            │        │ read_frame() + encode()      │
//!                            ▼        │   │                          │
//!                 Arc<Shared> ◄───────┼───┘ store under slot mutex   │
//!                 slot: Mutex<Option<CachedFrame>>                   │
//!                                     └──────────────────────────────┘
//! ```
//!
//! # Failure policy
//!
//! Failed reads are transient: the connection stays open and the read is
//! retried after a fixed backoff, forever, until the worker is stopped.
//! Encode failures leave the previous frame in place. Only a failed
//! connect is reported to the caller.

pub mod config;
pub mod error;
pub mod slot;
pub mod state;
pub mod stats;
pub mod stream;

mod poll;

pub use config::WorkerConfig;
pub use error::ConnectError;
pub use slot::CachedFrame;
pub use state::WorkerState;
pub use stats::WorkerStats;
pub use stream::{StreamBackend, StreamWorker};

//! Stream registry
//!
//! The registry owns every active stream worker, keyed by a caller-supplied
//! id, and is the single entry point for the layer above (HTTP handlers, a
//! CLI, a config loader).
//!
//! # Architecture
//!
//! ```text
//!                       Arc<StreamRegistry>
//!                  ┌──────────────────────────┐
//!                  │ streams: RwLock<HashMap< │
//!                  │   id, Arc<StreamWorker>  │
//!                  │ >>                       │
//!                  └────────────┬─────────────┘
//!                               │
//!       ┌───────────────────────┼───────────────────────┐
//!       ▼                       ▼                       ▼
//!  add / remove            get_frame(id)          get_frame(id)
//!  (write lock)      (read lock, clone the Arc,   ...
//!                     then the worker's own
//!                     frame mutex only)
//! ```
//!
//! Structural changes take the write lock and are serialized, including the
//! connect of a new worker and the stop of a replaced or removed one. Frame
//! reads hold the read lock only long enough to clone the worker handle; the
//! frame itself is read under the worker's own mutex. A slow connect
//! therefore stalls frame reads for every id until it finishes.

pub mod config;
pub mod error;
pub mod store;

pub use config::RegistryConfig;
pub use error::RegistryError;
pub use store::StreamRegistry;

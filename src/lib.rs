//! camcache: latest-frame cache for network cameras
//!
//! Each registered stream gets a background worker that keeps the camera's
//! most recent frame encoded as a still image, so any number of readers can
//! fetch a snapshot without touching the camera connection.
//!
//! # Example
//!
//! ```no_run
//! use camcache::{CameraConfig, StreamRegistry};
//!
//! # async fn run() -> camcache::Result<()> {
//! let registry = StreamRegistry::new();
//!
//! let front = CameraConfig::new("rtsp://192.168.1.10:554/stream1")
//!     .credentials("admin", "secret")
//!     .fps(10)
//!     .resolution(1280, 720);
//! registry.add("front", front).await?;
//!
//! let frame = registry.get_frame("front").await?;
//! println!("{} bytes of {}", frame.len(), registry.content_type());
//!
//! registry.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! Real RTSP decoding needs the `rtsp-gstreamer` feature. Without it only
//! `stub://` addresses (a synthetic test pattern) can be opened.

pub mod camera;
pub mod catalog;
pub mod encode;
pub mod error;
pub mod registry;
pub mod source;
pub mod worker;

#[cfg(test)]
mod testing;

pub use camera::{CameraConfig, ConfigError, ConnectTarget, Resolution};
pub use catalog::{CameraCatalog, CatalogError};
pub use encode::{EncodeError, JpegEncoder, StillEncoder};
pub use error::{Error, Result};
pub use registry::{RegistryConfig, RegistryError, StreamRegistry};
pub use source::{
    DefaultTransport, FrameSource, RawFrame, SourceError, StreamHints, SyntheticTransport,
    Transport,
};
pub use worker::{
    CachedFrame, ConnectError, StreamBackend, StreamWorker, WorkerConfig, WorkerState,
    WorkerStats,
};

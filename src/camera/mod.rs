//! Camera definitions
//!
//! This module provides:
//! - `CameraConfig`, the per-stream record supplied at add-time
//! - `ConnectTarget`, the transport address derived from it

pub mod config;
pub mod target;

pub use config::{CameraConfig, ConfigError, Resolution, DEFAULT_FPS, DEFAULT_RESOLUTION};
pub use target::ConnectTarget;

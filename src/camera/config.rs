//! Camera configuration
//!
//! A [`CameraConfig`] describes one stream: where it lives, how to log in,
//! and what rate and size the caller wants frames at. The record is supplied
//! by whoever owns camera definitions and is never mutated by the core.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default sample rate when none is configured
pub const DEFAULT_FPS: u32 = 30;

/// Default decode resolution when none is configured
pub const DEFAULT_RESOLUTION: Resolution = Resolution {
    width: 1280,
    height: 720,
};

/// Target decode resolution
///
/// Serialized as a `[width, height]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        DEFAULT_RESOLUTION
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl From<Resolution> for (u32, u32) {
    fn from(r: Resolution) -> Self {
        (r.width, r.height)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Configuration for a single camera stream
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Human readable name (informational only)
    #[serde(default)]
    pub name: String,

    /// Stream address, e.g. `rtsp://192.168.1.10:554/stream1`
    #[serde(alias = "rtsp_url")]
    pub address: String,

    /// Username for the stream, only used together with `password`
    #[serde(default)]
    pub username: Option<String>,

    /// Password for the stream, only used together with `username`
    #[serde(default)]
    pub password: Option<String>,

    /// Target sample rate in frames per second
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Target decode resolution
    #[serde(default)]
    pub resolution: Resolution,
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}

impl CameraConfig {
    /// Create a config for the given address with default rate and resolution
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            address: address.into(),
            username: None,
            password: None,
            fps: DEFAULT_FPS,
            resolution: DEFAULT_RESOLUTION,
        }
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set both credentials
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the target sample rate
    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the target decode resolution
    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = Resolution::new(width, height);
        self
    }

    /// Credential pair to embed in the connection address
    ///
    /// Returns `None` unless both username and password are present and
    /// non-empty. A partial pair is not an error, it is simply ignored.
    pub fn login(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    /// Pacing delay between successful reads (`1 / fps`)
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// Check the config before any connection attempt
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::EmptyAddress);
        }
        if let Err(e) = url::Url::parse(self.address.trim()) {
            return Err(ConfigError::InvalidAddress(e.to_string()));
        }
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(ConfigError::ZeroResolution(self.resolution));
        }
        Ok(())
    }
}

// Manual impl keeps the password out of logs.
impl fmt::Debug for CameraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraConfig")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("fps", &self.fps)
            .field("resolution", &self.resolution)
            .finish()
    }
}

/// Invalid camera configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Address is empty
    EmptyAddress,
    /// Address is not a valid URI
    InvalidAddress(String),
    /// Credentials cannot be embedded in this address
    CredentialsNotSupported,
    /// Sample rate must be positive
    ZeroFps,
    /// Both resolution dimensions must be positive
    ZeroResolution(Resolution),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyAddress => write!(f, "Stream address is empty"),
            ConfigError::InvalidAddress(reason) => write!(f, "Invalid stream address: {}", reason),
            ConfigError::CredentialsNotSupported => {
                write!(f, "Stream address cannot carry credentials")
            }
            ConfigError::ZeroFps => write!(f, "Frame rate must be greater than zero"),
            ConfigError::ZeroResolution(r) => write!(f, "Invalid resolution: {}", r),
        }
    }
}

impl std::error::Error for ConfigError {}

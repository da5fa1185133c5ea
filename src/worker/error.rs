//! Worker error types

use std::fmt;

use crate::camera::ConfigError;
use crate::source::SourceError;

/// Stream could not be connected
///
/// Returned once to the caller of `connect`; nothing is retried and no
/// background task is left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// Config rejected before any connection attempt
    InvalidConfig(ConfigError),
    /// Transport failed to open the stream
    Open {
        /// Address with the password masked
        target: String,
        reason: SourceError,
    },
    /// The blocking open task panicked or was cancelled
    Aborted(String),
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectError::InvalidConfig(e) => write!(f, "Invalid camera config: {}", e),
            ConnectError::Open { target, reason } => {
                write!(f, "Failed to connect to {}: {}", target, reason)
            }
            ConnectError::Aborted(reason) => write!(f, "Connect aborted: {}", reason),
        }
    }
}

impl std::error::Error for ConnectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectError::InvalidConfig(e) => Some(e),
            ConnectError::Open { reason, .. } => Some(reason),
            ConnectError::Aborted(_) => None,
        }
    }
}

impl From<ConfigError> for ConnectError {
    fn from(e: ConfigError) -> Self {
        ConnectError::InvalidConfig(e)
    }
}

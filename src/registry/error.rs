//! Registry error types
//!
//! Error types for stream registry operations.

use crate::worker::ConnectError;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Stream not found
    NotFound(String),
    /// Stream exists but has not cached a frame yet
    NoFrameYet(String),
    /// Stream could not be added
    Connect { id: String, error: ConnectError },
}

impl RegistryError {
    /// Id of the stream the error refers to
    pub fn stream_id(&self) -> &str {
        match self {
            RegistryError::NotFound(id)
            | RegistryError::NoFrameYet(id)
            | RegistryError::Connect { id, .. } => id,
        }
    }
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::NotFound(id) => write!(f, "Stream not found: {}", id),
            RegistryError::NoFrameYet(id) => write!(f, "No frame available yet: {}", id),
            RegistryError::Connect { id, error } => {
                write!(f, "Failed to add stream {}: {}", id, error)
            }
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Connect { error, .. } => Some(error),
            _ => None,
        }
    }
}

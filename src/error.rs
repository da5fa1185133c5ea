//! Error types
//!
//! Each subsystem defines its own error enum; this module collects them into
//! a crate-level [`Error`] so hosts can use a single `Result` type.

use std::fmt;

use crate::camera::ConfigError;
use crate::catalog::CatalogError;
use crate::encode::EncodeError;
use crate::registry::RegistryError;
use crate::source::SourceError;
use crate::worker::ConnectError;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug)]
pub enum Error {
    /// Invalid camera configuration
    Config(ConfigError),
    /// Stream could not be connected
    Connect(ConnectError),
    /// Registry operation failed
    Registry(RegistryError),
    /// Transport or decoder failure
    Source(SourceError),
    /// Still image encoding failed
    Encode(EncodeError),
    /// Camera catalog could not be loaded or saved
    Catalog(CatalogError),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Config error: {}", e),
            Error::Connect(e) => write!(f, "Connect error: {}", e),
            Error::Registry(e) => write!(f, "Registry error: {}", e),
            Error::Source(e) => write!(f, "Source error: {}", e),
            Error::Encode(e) => write!(f, "Encode error: {}", e),
            Error::Catalog(e) => write!(f, "Catalog error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Connect(e) => Some(e),
            Error::Registry(e) => Some(e),
            Error::Source(e) => Some(e),
            Error::Encode(e) => Some(e),
            Error::Catalog(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<ConnectError> for Error {
    fn from(e: ConnectError) -> Self {
        Error::Connect(e)
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Error::Registry(e)
    }
}

impl From<SourceError> for Error {
    fn from(e: SourceError) -> Self {
        Error::Source(e)
    }
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Error::Encode(e)
    }
}

impl From<CatalogError> for Error {
    fn from(e: CatalogError) -> Self {
        Error::Catalog(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_wraps_inner() {
        let err: Error = RegistryError::NotFound("cam1".into()).into();
        assert_eq!(err.to_string(), "Registry error: Stream not found: cam1");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let err: Error = ConfigError::ZeroFps.into();
        assert!(err.source().is_some());
    }
}

//! Connection targets
//!
//! Turns a [`CameraConfig`] into the address handed to the transport,
//! embedding credentials into the URI userinfo when both halves are present.

use std::fmt;

use url::Url;

use super::config::{CameraConfig, ConfigError};

/// Address the transport should open
///
/// `Display` never shows the password; use [`ConnectTarget::as_str`] when the
/// full address is needed.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    url: Url,
}

impl ConnectTarget {
    /// Build a target from a camera config
    ///
    /// Credentials are inserted only if both username and password are set.
    /// An address that already carries userinfo is used as given.
    pub fn from_config(config: &CameraConfig) -> Result<Self, ConfigError> {
        let mut url = Url::parse(config.address.trim())
            .map_err(|e| ConfigError::InvalidAddress(e.to_string()))?;

        let has_userinfo = !url.username().is_empty() || url.password().is_some();
        if !has_userinfo {
            if let Some((user, pass)) = config.login() {
                url.set_username(user)
                    .map_err(|_| ConfigError::CredentialsNotSupported)?;
                url.set_password(Some(pass))
                    .map_err(|_| ConfigError::CredentialsNotSupported)?;
            }
        }

        Ok(Self { url })
    }

    /// Full address including any credentials
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Parsed address
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// URI scheme (`rtsp`, `stub`, ...)
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Whether the address carries credentials
    pub fn has_credentials(&self) -> bool {
        !self.url.username().is_empty() || self.url.password().is_some()
    }

    /// Address with the password masked, for logs
    pub fn redacted(&self) -> String {
        if self.url.password().is_none() {
            return self.url.to_string();
        }
        let mut masked = self.url.clone();
        // Cannot fail: the url already holds a password.
        let _ = masked.set_password(Some("***"));
        masked.to_string()
    }
}

impl fmt::Display for ConnectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl fmt::Debug for ConnectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectTarget").field(&self.redacted()).finish()
    }
}

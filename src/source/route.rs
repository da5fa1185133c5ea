//! Scheme-based transport routing

use crate::camera::ConnectTarget;

use super::synthetic::{self, SyntheticTransport};
use super::{FrameSource, SourceError, Transport};

/// Routes `stub://` addresses to [`SyntheticTransport`] and everything else
/// to GStreamer when the `rtsp-gstreamer` feature is enabled.
#[derive(Debug, Default)]
pub struct DefaultTransport {
    synthetic: SyntheticTransport,
    #[cfg(feature = "rtsp-gstreamer")]
    gstreamer: super::gstreamer::GstTransport,
}

impl DefaultTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for DefaultTransport {
    fn open(&self, target: &ConnectTarget) -> Result<Box<dyn FrameSource>, SourceError> {
        if target.scheme() == synthetic::SCHEME {
            return self.synthetic.open(target);
        }

        #[cfg(feature = "rtsp-gstreamer")]
        {
            self.gstreamer.open(target)
        }
        #[cfg(not(feature = "rtsp-gstreamer"))]
        {
            Err(SourceError::UnsupportedScheme(format!(
                "{} (build with the rtsp-gstreamer feature)",
                target.scheme()
            )))
        }
    }
}

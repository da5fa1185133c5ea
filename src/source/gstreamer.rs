//! RTSP frame source using GStreamer
//!
//! Pipeline: `rtspsrc ! decodebin ! videoconvert ! videoscale ! videorate !
//! appsink`, with the appsink negotiating packed RGB. Resolution and rate
//! hints are applied by narrowing the appsink caps after the pipeline is
//! running; upstream may or may not honor them.

use std::time::Duration;

use gstreamer::prelude::*;

use crate::camera::ConnectTarget;

use super::{FrameSource, RawFrame, SourceError, StreamHints, Transport};

/// How long `open` waits for the pipeline to reach Playing
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read timeout used until a rate hint arrives
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Transport for `rtsp://` (and anything else `rtspsrc` accepts)
#[derive(Debug, Default)]
pub struct GstTransport {
    _private: (),
}

impl GstTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for GstTransport {
    fn open(&self, target: &ConnectTarget) -> Result<Box<dyn FrameSource>, SourceError> {
        gstreamer::init().map_err(|e| SourceError::Open(format!("gstreamer init: {}", e)))?;

        let description = format!(
            "rtspsrc location=\"{}\" latency=0 ! decodebin ! videoconvert ! videoscale ! \
             videorate ! appsink name=appsink sync=false max-buffers=1 drop=true",
            target.as_str()
        );
        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| SourceError::Open(format!("build pipeline: {}", e)))?
            .downcast::<gstreamer::Pipeline>()
            .map_err(|_| SourceError::Open("pipeline has unexpected type".into()))?;

        let appsink = pipeline
            .by_name("appsink")
            .ok_or_else(|| SourceError::Open("appsink missing from pipeline".into()))?
            .downcast::<gstreamer_app::AppSink>()
            .map_err(|_| SourceError::Open("appsink has unexpected type".into()))?;

        appsink.set_caps(Some(
            &gstreamer::Caps::builder("video/x-raw")
                .field("format", "RGB")
                .build(),
        ));

        if let Err(e) = pipeline.set_state(gstreamer::State::Playing) {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(SourceError::Open(format!("{}: {}", target, e)));
        }

        let timeout = gstreamer::ClockTime::from_mseconds(CONNECT_TIMEOUT.as_millis() as u64);
        let (result, _, _) = pipeline.state(timeout);
        if let Err(e) = result {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(SourceError::Open(format!("{}: {}", target, e)));
        }

        tracing::info!(target = %target, "GStreamer pipeline playing");

        Ok(Box::new(GstSource {
            pipeline,
            appsink,
            read_timeout: DEFAULT_READ_TIMEOUT,
            closed: false,
        }))
    }
}

struct GstSource {
    pipeline: gstreamer::Pipeline,
    appsink: gstreamer_app::AppSink,
    read_timeout: Duration,
    closed: bool,
}

impl GstSource {
    /// Drain pending bus messages, returning the first error or EOS seen
    fn poll_bus(&self) -> Option<SourceError> {
        let bus = self.pipeline.bus()?;
        let mut failure = None;

        while let Some(message) = bus.timed_pop(gstreamer::ClockTime::ZERO) {
            use gstreamer::MessageView;
            match message.view() {
                MessageView::Error(err) if failure.is_none() => {
                    failure = Some(SourceError::Decode(format!(
                        "{:?}: {}",
                        err.src().map(|s| s.path_string()),
                        err.error()
                    )));
                }
                MessageView::Eos(..) if failure.is_none() => {
                    failure = Some(SourceError::EndOfStream);
                }
                _ => {}
            }
        }

        failure
    }
}

impl FrameSource for GstSource {
    fn apply_hints(&mut self, hints: &StreamHints) {
        let fps = hints.fps.max(1);
        let caps = gstreamer::Caps::builder("video/x-raw")
            .field("format", "RGB")
            .field("width", hints.resolution.width as i32)
            .field("height", hints.resolution.height as i32)
            .field("framerate", gstreamer::Fraction::new(fps as i32, 1))
            .build();
        self.appsink.set_caps(Some(&caps));

        // Four frame intervals, never below half a second.
        self.read_timeout = (Duration::from_secs(1) / fps * 4).max(Duration::from_millis(500));
    }

    fn read_frame(&mut self) -> Result<RawFrame, SourceError> {
        if self.closed {
            return Err(SourceError::Closed);
        }
        if let Some(failure) = self.poll_bus() {
            return Err(failure);
        }

        let timeout = gstreamer::ClockTime::from_mseconds(self.read_timeout.as_millis() as u64);
        match self.appsink.try_pull_sample(timeout) {
            Some(sample) => sample_to_frame(&sample),
            None if self.appsink.is_eos() => Err(SourceError::EndOfStream),
            None => Err(SourceError::Timeout),
        }
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
                tracing::warn!(error = %e, "Failed to stop GStreamer pipeline");
            }
        }
    }
}

impl Drop for GstSource {
    fn drop(&mut self) {
        self.close();
    }
}

fn sample_to_frame(sample: &gstreamer::Sample) -> Result<RawFrame, SourceError> {
    let buffer = sample
        .buffer()
        .ok_or_else(|| SourceError::Decode("sample missing buffer".into()))?;
    let caps = sample
        .caps()
        .ok_or_else(|| SourceError::Decode("sample missing caps".into()))?;
    let info = gstreamer_video::VideoInfo::from_caps(caps)
        .map_err(|e| SourceError::Decode(format!("parse caps: {}", e)))?;

    let width = info.width();
    let height = info.height();
    let row_bytes = width as usize * 3;
    let stride = info.stride()[0] as usize;

    let map = buffer
        .map_readable()
        .map_err(|e| SourceError::Decode(format!("map buffer: {}", e)))?;
    let data = map.as_slice();

    if stride == row_bytes {
        let len = row_bytes * height as usize;
        let pixels = data
            .get(..len)
            .ok_or_else(|| SourceError::Decode("buffer shorter than frame".into()))?;
        return Ok(RawFrame::new(width, height, pixels.to_vec()));
    }

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        let line = data
            .get(start..start + row_bytes)
            .ok_or_else(|| SourceError::Decode("buffer row out of bounds".into()))?;
        pixels.extend_from_slice(line);
    }

    Ok(RawFrame::new(width, height, pixels))
}

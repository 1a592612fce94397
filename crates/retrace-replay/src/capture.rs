//! Video capture seam.
//!
//! The engine never encodes video itself. A [`CaptureSurface`] turns the
//! render target into a [`MediaStream`], and a [`RecorderFactory`] opens
//! a [`MediaRecorder`] on that stream. The recorder reports encoded
//! chunks and its stop confirmation as [`RecorderEvent`]s over a
//! channel; the engine collects them into one [`VideoBlob`].

use std::any::Any;
use std::fmt;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, warn};

use crate::error::CaptureError;

/// Preferred recording codec.
pub const MIME_VP9: &str = "video/webm;codecs=vp9";
/// Fallback recording codec.
pub const MIME_VP8: &str = "video/webm;codecs=vp8";
/// Blob type used when the recorder reports no mime type.
pub const MIME_FALLBACK: &str = "video/webm";

/// Whether a playback should be recorded to video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaptureMode {
    /// No capture.
    #[default]
    None,
    /// Record rendered frames to a WebM blob.
    Video,
}

/// A live frame stream produced by a [`CaptureSurface`].
///
/// Carries the backend's native stream handle opaquely from the surface
/// to the recorder factory.
pub struct MediaStream {
    fps: u32,
    handle: Box<dyn Any + Send>,
}

impl MediaStream {
    /// Wrap a backend stream handle.
    pub fn new(fps: u32, handle: impl Any + Send) -> Self {
        Self {
            fps,
            handle: Box::new(handle),
        }
    }

    /// Frame rate the stream was opened at.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Borrow the backend handle, if it has type `T`.
    pub fn handle<T: Any>(&self) -> Option<&T> {
        self.handle.downcast_ref()
    }
}

impl fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStream")
            .field("fps", &self.fps)
            .finish_non_exhaustive()
    }
}

/// A render target that can be captured as a frame stream.
pub trait CaptureSurface {
    /// Open a stream of the surface's frames at `fps`.
    fn capture_stream(&mut self, fps: u32) -> Result<MediaStream, CaptureError>;
}

/// Notifications from a running [`MediaRecorder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecorderEvent {
    /// An encoded chunk. Empty chunks are ignored.
    Data(Vec<u8>),
    /// The recorder has flushed everything and stopped.
    Stopped,
}

/// An encoder attached to a [`MediaStream`].
pub trait MediaRecorder {
    /// Begin recording.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Request a stop. Remaining data and then [`RecorderEvent::Stopped`]
    /// follow on the event channel.
    fn stop(&mut self) -> Result<(), CaptureError>;

    /// Mime type actually in use. May be empty.
    fn mime_type(&self) -> &str;
}

/// Creates recorders; the media-recorder capability of the host.
pub trait RecorderFactory {
    /// Whether the backend can encode `mime`.
    fn is_type_supported(&self, mime: &str) -> bool;

    /// Open a recorder on `stream` that reports to `events`.
    fn open(
        &mut self,
        stream: MediaStream,
        mime: &str,
        events: Sender<RecorderEvent>,
    ) -> Result<Box<dyn MediaRecorder>, CaptureError>;
}

/// An encoded recording.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoBlob {
    /// Concatenated encoded chunks.
    pub data: Vec<u8>,
    /// Container/codec type.
    pub mime_type: String,
}

impl VideoBlob {
    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Pick the best codec the factory supports.
pub fn negotiate_mime(factory: &dyn RecorderFactory) -> &'static str {
    if factory.is_type_supported(MIME_VP9) {
        MIME_VP9
    } else {
        MIME_VP8
    }
}

/// Capture backends resolved for one playback.
///
/// Resolution happens before playback mutates anything, so a missing
/// capability fails the call with nothing to undo.
pub(crate) enum CaptureStrategy<'a> {
    Disabled,
    Video {
        surface: &'a mut dyn CaptureSurface,
        factory: &'a mut dyn RecorderFactory,
    },
}

impl<'a> CaptureStrategy<'a> {
    pub(crate) fn resolve(
        mode: CaptureMode,
        surface: Option<&'a mut dyn CaptureSurface>,
        factory: Option<&'a mut dyn RecorderFactory>,
    ) -> Result<Self, CaptureError> {
        match mode {
            CaptureMode::None => Ok(Self::Disabled),
            CaptureMode::Video => Ok(Self::Video {
                surface: surface.ok_or(CaptureError::MissingSurface)?,
                factory: factory.ok_or(CaptureError::MissingRecorder)?,
            }),
        }
    }

    /// Open the stream and start recording.
    pub(crate) fn start(
        self,
        fps: u32,
        flush_timeout: Duration,
    ) -> Result<Option<CaptureSession>, CaptureError> {
        let Self::Video { surface, factory } = self else {
            return Ok(None);
        };
        let stream = surface.capture_stream(fps)?;
        let mime = negotiate_mime(factory);
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut recorder = factory.open(stream, mime, tx)?;
        recorder.start()?;
        debug!(mime, fps, "replay capture started");
        Ok(Some(CaptureSession {
            recorder,
            events: rx,
            chunks: Vec::new(),
            flush_timeout,
            stopped: false,
        }))
    }
}

/// A running recording. Stops the recorder if dropped unfinished.
pub(crate) struct CaptureSession {
    recorder: Box<dyn MediaRecorder>,
    events: Receiver<RecorderEvent>,
    chunks: Vec<u8>,
    flush_timeout: Duration,
    stopped: bool,
}

impl CaptureSession {
    /// Stop the recorder and collect the encoded blob.
    pub(crate) fn finish(mut self) -> Result<VideoBlob, CaptureError> {
        self.stopped = true;
        self.recorder.stop()?;
        loop {
            match self.events.recv_timeout(self.flush_timeout) {
                Ok(RecorderEvent::Data(bytes)) => self.chunks.extend_from_slice(&bytes),
                Ok(RecorderEvent::Stopped) => break,
                Err(RecvTimeoutError::Timeout) => {
                    return Err(CaptureError::FlushTimeout {
                        timeout_ms: u64::try_from(self.flush_timeout.as_millis())
                            .unwrap_or(u64::MAX),
                    });
                }
                Err(RecvTimeoutError::Disconnected) => return Err(CaptureError::Disconnected),
            }
        }

        let mime_type = match self.recorder.mime_type() {
            "" => MIME_FALLBACK.to_owned(),
            mime => mime.to_owned(),
        };
        let data = std::mem::take(&mut self.chunks);
        debug!(bytes = data.len(), mime = %mime_type, "replay capture finished");
        Ok(VideoBlob { data, mime_type })
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if !self.stopped {
            if let Err(err) = self.recorder.stop() {
                warn!(%err, "failed to stop abandoned replay capture");
            }
        }
    }
}

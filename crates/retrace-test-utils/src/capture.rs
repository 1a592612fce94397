//! Fake capture surface and media recorder.

use std::sync::{Arc, Mutex};

use crossbeam_channel::Sender;
use retrace_replay::{
    CaptureError, CaptureSurface, MediaRecorder, MediaStream, RecorderEvent, RecorderFactory,
};

/// Canvas stand-in whose streams carry a fixed label.
#[derive(Clone, Debug, Default)]
pub struct FakeCanvas {
    streams: Arc<Mutex<Vec<u32>>>,
}

impl FakeCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame rates of every stream opened so far.
    pub fn streams_opened(&self) -> Vec<u32> {
        self.streams.lock().unwrap().clone()
    }
}

impl CaptureSurface for FakeCanvas {
    fn capture_stream(&mut self, fps: u32) -> Result<MediaStream, CaptureError> {
        self.streams.lock().unwrap().push(fps);
        Ok(MediaStream::new(fps, "fake-canvas"))
    }
}

/// What the fake recorders did, shared with the test.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecorderStats {
    pub opened_mime: Vec<String>,
    pub starts: usize,
    pub stops: usize,
}

/// Media-recorder capability whose recorders emit a few fixed bytes.
///
/// Each recorder sends one chunk on start and one on stop, then
/// confirms the stop (unless told not to).
#[derive(Clone, Debug)]
pub struct FakeRecorderFactory {
    vp9: bool,
    confirm_stop: bool,
    stats: Arc<Mutex<RecorderStats>>,
}

impl FakeRecorderFactory {
    pub fn new() -> Self {
        Self {
            vp9: true,
            confirm_stop: true,
            stats: Arc::default(),
        }
    }

    /// Only the vp8 fallback is supported.
    pub fn vp8_only(mut self) -> Self {
        self.vp9 = false;
        self
    }

    /// Recorders never confirm they stopped.
    pub fn never_confirm_stop(mut self) -> Self {
        self.confirm_stop = false;
        self
    }

    pub fn stats(&self) -> RecorderStats {
        self.stats.lock().unwrap().clone()
    }
}

impl Default for FakeRecorderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderFactory for FakeRecorderFactory {
    fn is_type_supported(&self, mime: &str) -> bool {
        self.vp9 || !mime.contains("vp9")
    }

    fn open(
        &mut self,
        stream: MediaStream,
        mime: &str,
        events: Sender<RecorderEvent>,
    ) -> Result<Box<dyn MediaRecorder>, CaptureError> {
        if stream.handle::<&str>().is_none() {
            return Err(CaptureError::recorder("unrecognised stream"));
        }
        self.stats.lock().unwrap().opened_mime.push(mime.to_owned());
        Ok(Box::new(FakeRecorder {
            mime: mime.to_owned(),
            events,
            confirm_stop: self.confirm_stop,
            stats: Arc::clone(&self.stats),
        }))
    }
}

struct FakeRecorder {
    mime: String,
    events: Sender<RecorderEvent>,
    confirm_stop: bool,
    stats: Arc<Mutex<RecorderStats>>,
}

impl MediaRecorder for FakeRecorder {
    fn start(&mut self) -> Result<(), CaptureError> {
        self.stats.lock().unwrap().starts += 1;
        let _ = self.events.send(RecorderEvent::Data(b"\x1a\x45\xdf\xa3".to_vec()));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.stats.lock().unwrap().stops += 1;
        let _ = self.events.send(RecorderEvent::Data(Vec::new()));
        let _ = self.events.send(RecorderEvent::Data(b"cluster".to_vec()));
        if self.confirm_stop {
            let _ = self.events.send(RecorderEvent::Stopped);
        }
        Ok(())
    }

    fn mime_type(&self) -> &str {
        &self.mime
    }
}

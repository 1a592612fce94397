//! Deterministic run recording and playback for Retrace.
//!
//! While a run is live, the [`ReplayEngine`] installs a tape-recording
//! random source and logs one [`TickRecord`] per simulation tick. Once
//! the run ends, the log and tape are sealed into a [`ReplayRun`] that
//! can be played back against a fresh simulation any number of times,
//! optionally streaming rendered frames into a video recorder.
//!
//! # Architecture
//!
//! - [`ReplayEngine`] owns the recording lifecycle and drives playback
//! - [`ReplayRun`] / [`TickRecord`] are the recorded data, serializable
//!   to the persisted JSON shape
//! - [`capture`] defines the video capture seam ([`CaptureSurface`],
//!   [`RecorderFactory`], [`MediaRecorder`])
//! - [`host`] and [`status`] define the UI and status seams
//! - [`payload`] validates runs for upload and hydrates downloaded ones
//!
//! Playback never leaves swapped state behind: input, random source,
//! UI and the replaying flag are restored on every exit path.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod capture;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod input;
pub mod payload;
pub mod playback;
pub mod run;
pub mod status;

pub use capture::{
    negotiate_mime, CaptureMode, CaptureSurface, MediaRecorder, MediaStream, RecorderEvent,
    RecorderFactory, VideoBlob, MIME_FALLBACK, MIME_VP8, MIME_VP9,
};
pub use config::ReplayConfig;
pub use engine::{ReplayEngine, ReplayEngineBuilder, ReplayFlag, StepHook};
pub use error::{CaptureError, ConfigError, PayloadError, ReplayError};
pub use host::{NoopHost, ReplayHost};
pub use input::ReplayInput;
pub use payload::{
    build_payload, describe_replay_meta, format_duration_ms, hydrate_payload, ReplayLimits,
    ReplayMeta, ReplayPayload,
};
pub use playback::{PlayOptions, PlaybackReport, RandSourceKind, RenderMode};
pub use run::{ReplayRun, TickRecord};
pub use status::{NullStatus, StatusMessage, StatusSink};

//! Time-sampled state for Retrace.
//!
//! Remote state (server snapshots, ghost runs) arrives asynchronously
//! and out of order, tagged with the time it describes. A
//! [`SnapshotBuffer`] keeps a bounded, time-sorted window of those
//! snapshots and answers "what did the state look like at time `t`?",
//! clamping outside the window and optionally interpolating inside it.
//! [`RemoteStateSync`] packages one buffer with a fixed interpolation
//! policy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod interpolate;
pub mod remote;

pub use buffer::{SnapshotBuffer, SnapshotEntry};
pub use config::{SyncConfig, DEFAULT_MAX_SIZE};
pub use error::{ConfigError, SyncError};
pub use interpolate::{Interpolate, Lerp, Linear};
pub use remote::RemoteStateSync;

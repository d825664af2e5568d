//! Audio backend abstraction
//!
//! The player owns exactly one backend for its lifetime and injects it at
//! construction. Commands are non-blocking; load completion, progress,
//! end-of-stream and failures come back as token-tagged events over a
//! single-consumer channel, so a superseded load can be told apart from
//! the current one.

pub mod output;

use tokio::sync::mpsc;

/// Events reported by an audio backend.
///
/// `token` echoes the value passed to [`AudioBackend::play`]; the player
/// discards events whose token is not the latest issued.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// The source loaded and started producing sound
    Started {
        token: u64,
        /// Duration reported by the decoder, when the container knows it
        duration: Option<f64>,
    },

    /// Periodic position report while a source is loaded
    Progress { token: u64, position: f64 },

    /// The source played to the end
    Ended { token: u64 },

    /// Loading or playing the source failed
    Failed { token: u64, message: String },
}

/// Channel the backend reports through; the player task is the only
/// subscriber.
pub type EventSender = mpsc::UnboundedSender<BackendEvent>;

/// Transport-level capability set of an audio output.
///
/// All methods return immediately; results surface as [`BackendEvent`]s.
pub trait AudioBackend: Send {
    /// Begin loading and playing `url`, superseding any current source
    fn play(&mut self, token: u64, url: &str);

    /// Pause the current source, keeping its position
    fn pause(&mut self);

    /// Resume a paused source
    fn resume(&mut self);

    /// Stop and release the current source
    fn stop(&mut self);

    /// Seek to an absolute position in seconds. Out-of-range positions
    /// are ignored by the backend's own bounds check.
    fn seek(&mut self, position: f64);

    /// Apply a volume in [0.0, 1.0], effective immediately and retained
    /// across source changes
    fn set_volume(&mut self, volume: f32);
}

//! Types shared by the capture and playback ports

use std::sync::Arc;

use thiserror::Error;

/// Errors raised by the platform audio subsystem
#[derive(Debug, Clone, Error)]
pub enum AudioError {
    #[error("No audio device available")]
    NoAudioDevice,

    #[error("Audio mode does not allow recording")]
    RecordingDisabled,

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Failed to encode recording: {0}")]
    EncodingFailed(String),

    #[error("Unknown audio handle: {0}")]
    UnknownHandle(String),
}

/// Status listener registered for one active handle.
///
/// Called from adapter threads; implementations forward the status to the
/// owner of the managers instead of mutating state directly.
pub type StatusCallback<T> = Arc<dyn Fn(T) + Send + Sync>;

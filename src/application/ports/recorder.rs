//! Capture port interface

use async_trait::async_trait;

use crate::domain::recording::{CaptureHandle, Duration, PlayableHandle};

use super::audio::{AudioError, StatusCallback};

/// Outcome of a microphone permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Audio session options applied before capturing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioMode {
    /// Capture is allowed while the mode is active
    pub allow_recording: bool,
    /// Keep playing when the device is muted/silent
    pub plays_in_silent_mode: bool,
}

impl AudioMode {
    /// Mode used while a recording session is active
    pub const fn recording() -> Self {
        Self {
            allow_recording: true,
            plays_in_silent_mode: true,
        }
    }
}

/// Periodic capture status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureStatus {
    pub handle: CaptureHandle,
    pub elapsed: Duration,
    pub is_recording: bool,
}

/// Result of finalizing a capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedCapture {
    /// Decodable, replayable audio
    pub audio: PlayableHandle,
    /// Total captured duration
    pub duration: Duration,
    /// Location of the encoded file
    pub file_uri: String,
}

/// Port for microphone capture
#[async_trait]
pub trait AudioRecorder: Send + Sync {
    /// Ask the platform for microphone access.
    async fn request_recording_permission(&self) -> Result<Permission, AudioError>;

    /// Apply audio session options. Calling it repeatedly with the same mode
    /// has no further effect.
    async fn configure_audio_mode(&self, mode: AudioMode) -> Result<(), AudioError>;

    /// Begin capturing from the default input.
    ///
    /// # Arguments
    /// * `on_status` - Receives periodic elapsed-time updates until the
    ///   capture is finalized or discarded
    async fn begin_capture(
        &self,
        on_status: StatusCallback<CaptureStatus>,
    ) -> Result<CaptureHandle, AudioError>;

    /// Pause an active capture; elapsed time stops advancing.
    async fn pause_capture(&self, handle: CaptureHandle) -> Result<(), AudioError>;

    /// Stop capturing and turn the audio into a playable handle.
    async fn finalize_capture(&self, handle: CaptureHandle) -> Result<FinalizedCapture, AudioError>;

    /// Stop capturing and drop the audio.
    async fn discard_capture(&self, handle: CaptureHandle) -> Result<(), AudioError> {
        self.finalize_capture(handle).await.map(|_| ())
    }
}

//! Playback port interface

use async_trait::async_trait;

use crate::domain::recording::{Duration, PlayableHandle};

use super::audio::{AudioError, StatusCallback};

/// Periodic playback status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStatus {
    pub handle: PlayableHandle,
    pub position: Duration,
    pub is_playing: bool,
    /// Set once, when the audio reaches its natural end
    pub did_finish: bool,
}

/// Port for playing finalized recordings
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Play `handle` from position zero.
    ///
    /// # Arguments
    /// * `on_status` - Receives position updates and the completion status;
    ///   dropped once playback stops or finishes
    async fn play(
        &self,
        handle: PlayableHandle,
        on_status: StatusCallback<PlaybackStatus>,
    ) -> Result<(), AudioError>;

    /// Jump to `position` within the playing audio.
    async fn seek(&self, handle: PlayableHandle, position: Duration) -> Result<(), AudioError>;

    /// Stop playing `handle`.
    async fn stop(&self, handle: PlayableHandle) -> Result<(), AudioError>;

    /// Free the audio behind `handle`; it cannot be played afterwards.
    async fn release(&self, handle: PlayableHandle) -> Result<(), AudioError>;
}

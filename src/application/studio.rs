//! Studio: the recorder screen's owned service object
//!
//! Ties the recording session manager, the playback manager and the
//! recordings list together. A `Studio` is driven by one owner at a time
//! (`&mut self`); audio status callbacks are forwarded into a channel and fed
//! back through [`Studio::handle_event`] by that same owner, so every mutation
//! is serialized.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::error::InvalidIndex;
use crate::domain::recording::{Duration, PlayableHandle, RecordingCollection, RecordingItem};
use crate::domain::session::{PlaybackState, RecorderState};

use super::error::StudioError;
use super::playback::{PlaybackManager, PlaybackUpdate};
use super::ports::{
    AudioCue, AudioCueType, AudioPlayer, AudioRecorder, CaptureStatus, PlaybackStatus,
    StatusCallback,
};
use super::recording_session::RecordingSessionManager;

/// Status callback forwarded from the audio subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    Capture(CaptureStatus),
    Playback(PlaybackStatus),
}

/// Visible effect of an [`AudioEvent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudioUpdate {
    Ignored,
    /// Recording timer moved
    Elapsed(Duration),
    /// Playback timer moved
    Position(Duration),
    /// Playback of the named item reached its end
    PlaybackFinished(String),
}

/// Behavior switches for a studio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudioConfig {
    /// Stop playback when its item is deleted or the list is cleared
    pub stop_playback_on_delete: bool,
    /// Recording length after which the owner should stop automatically
    pub max_duration: Duration,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            stop_playback_on_delete: true,
            max_duration: Duration::default_max_duration(),
        }
    }
}

/// Recorder screen service
pub struct Studio<R: AudioRecorder, P: AudioPlayer> {
    recorder: RecordingSessionManager<R>,
    playback: PlaybackManager<P>,
    recordings: RecordingCollection,
    cue: Arc<dyn AudioCue>,
    config: StudioConfig,
    /// Audio of a removed item that was left playing; released once it ends
    detached: Option<PlayableHandle>,
}

impl<R: AudioRecorder, P: AudioPlayer> Studio<R, P> {
    /// Create a studio.
    ///
    /// # Returns
    /// The studio and the receiver its audio status callbacks are sent to
    pub fn new(
        recorder: R,
        player: P,
        cue: Arc<dyn AudioCue>,
        config: StudioConfig,
    ) -> (Self, mpsc::UnboundedReceiver<AudioEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let capture_tx = tx.clone();
        let on_capture: StatusCallback<CaptureStatus> = Arc::new(move |status| {
            let _ = capture_tx.send(AudioEvent::Capture(status));
        });
        let on_playback: StatusCallback<PlaybackStatus> = Arc::new(move |status| {
            let _ = tx.send(AudioEvent::Playback(status));
        });

        let studio = Self {
            recorder: RecordingSessionManager::new(recorder, on_capture),
            playback: PlaybackManager::new(player, on_playback),
            recordings: RecordingCollection::new(),
            cue,
            config,
            detached: None,
        };
        (studio, rx)
    }

    pub fn recordings(&self) -> &RecordingCollection {
        &self.recordings
    }

    pub fn recorder_state(&self) -> RecorderState {
        self.recorder.state()
    }

    /// Recording timer
    pub fn elapsed(&self) -> Duration {
        self.recorder.elapsed()
    }

    pub fn playback_state(&self) -> &PlaybackState {
        self.playback.state()
    }

    /// Playback timer
    pub fn position(&self) -> Duration {
        self.playback.position()
    }

    pub fn config(&self) -> StudioConfig {
        self.config
    }

    /// Whether an active recording has reached the configured limit
    pub fn max_duration_reached(&self) -> bool {
        matches!(self.recorder.state(), RecorderState::Recording(_))
            && self.recorder.elapsed() >= self.config.max_duration
    }

    pub async fn start_recording(&mut self) -> Result<(), StudioError> {
        self.recorder.start().await?;
        self.play_cue(AudioCueType::RecordingStart);
        Ok(())
    }

    pub async fn pause_recording(&mut self) -> Result<(), StudioError> {
        self.recorder.pause().await
    }

    /// Stop recording and append the result.
    ///
    /// # Returns
    /// The new item
    pub async fn stop_recording(&mut self) -> Result<&RecordingItem, StudioError> {
        let index = self.recorder.stop(&mut self.recordings).await?;
        self.play_cue(AudioCueType::RecordingStop);
        self.item(index)
    }

    pub async fn discard_recording(&mut self) -> Result<(), StudioError> {
        self.recorder.discard().await?;
        self.play_cue(AudioCueType::RecordingDiscard);
        Ok(())
    }

    /// Play the item at `index` from the start
    pub async fn play(&mut self, index: usize) -> Result<(), StudioError> {
        let item = self.item(index)?.clone();
        let result = self.playback.play(item).await;
        self.release_detached().await;
        result
    }

    /// Seek the playing item
    pub async fn seek(&mut self, position: Duration) -> Result<(), StudioError> {
        self.playback.seek(position).await
    }

    /// Stop the playing item
    pub async fn stop_playback(&mut self) -> Result<(), StudioError> {
        let result = self.playback.stop().await.map(|_| ());
        self.release_detached().await;
        result
    }

    pub fn rename(&mut self, index: usize, new_name: impl Into<String>) -> Result<(), StudioError> {
        let new_name = new_name.into();
        self.recordings.rename(index, new_name.as_str())?;
        info!(index, name = %new_name, "Recording renamed");
        Ok(())
    }

    /// Remove the item at `index`.
    ///
    /// When the item is playing, playback is stopped first if
    /// `stop_playback_on_delete` is set; otherwise it keeps playing the
    /// detached audio.
    pub async fn delete(&mut self, index: usize) -> Result<RecordingItem, StudioError> {
        let audio = self.item(index)?.audio();

        if self.playback.is_playing_handle(audio) && self.config.stop_playback_on_delete {
            self.playback.stop().await?;
        }

        let removed = self.recordings.delete(index)?;
        self.release_or_detach(audio).await;
        info!(index, name = removed.name(), "Recording deleted");
        Ok(removed)
    }

    /// Remove every item.
    ///
    /// The collection is emptied even when stopping playback fails.
    ///
    /// # Returns
    /// How many items were removed
    pub async fn clear(&mut self) -> Result<usize, StudioError> {
        if self.playback.is_playing() && self.config.stop_playback_on_delete {
            if let Err(err) = self.playback.stop().await {
                warn!(error = %err, "Failed to stop playback before clearing");
            }
        }

        let removed = self.recordings.clear();
        for item in &removed {
            self.release_or_detach(item.audio()).await;
        }
        info!(count = removed.len(), "Recordings cleared");
        Ok(removed.len())
    }

    /// Items whose name contains `query`, ignoring case, with their indices
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = (usize, &'a RecordingItem)> + 'a {
        self.recordings.search(query)
    }

    /// Apply a forwarded status callback
    pub async fn handle_event(&mut self, event: AudioEvent) -> StudioUpdate {
        match event {
            AudioEvent::Capture(status) => {
                if self.recorder.handle_status(status) {
                    StudioUpdate::Elapsed(self.recorder.elapsed())
                } else {
                    StudioUpdate::Ignored
                }
            }
            AudioEvent::Playback(status) => match self.playback.handle_status(status) {
                PlaybackUpdate::Ignored => StudioUpdate::Ignored,
                PlaybackUpdate::Position(position) => StudioUpdate::Position(position),
                PlaybackUpdate::Finished(name) => {
                    self.release_detached().await;
                    StudioUpdate::PlaybackFinished(name)
                }
            },
        }
    }

    /// Tear down: stop playback and drop an unfinished capture.
    pub async fn shutdown(&mut self) {
        if self.playback.is_playing() {
            if let Err(err) = self.playback.stop().await {
                warn!(error = %err, "Failed to stop playback during shutdown");
            }
        }
        if self.recorder.state() != RecorderState::Idle {
            if let Err(err) = self.recorder.discard().await {
                warn!(error = %err, "Failed to discard recording during shutdown");
            }
        }
        self.release_detached().await;
        debug!("Studio shut down");
    }

    fn item(&self, index: usize) -> Result<&RecordingItem, StudioError> {
        self.recordings.get(index).ok_or(StudioError::InvalidIndex(InvalidIndex {
            index,
            len: self.recordings.len(),
        }))
    }

    /// Release a removed item's audio, or hold on to it while it still plays
    async fn release_or_detach(&mut self, audio: PlayableHandle) {
        if self.playback.is_playing_handle(audio) {
            self.detached = Some(audio);
        } else {
            self.playback.release(audio).await;
        }
    }

    async fn release_detached(&mut self) {
        if let Some(audio) = self.detached {
            if !self.playback.is_playing_handle(audio) {
                self.detached = None;
                self.playback.release(audio).await;
            }
        }
    }

    fn play_cue(&self, cue_type: AudioCueType) {
        let cue = Arc::clone(&self.cue);
        tokio::spawn(async move {
            if let Err(err) = cue.play(cue_type).await {
                debug!(error = %err, "Audio cue failed");
            }
        });
    }
}

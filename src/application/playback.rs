//! Playback manager use case

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::recording::{Duration, PlayableHandle, RecordingItem};
use crate::domain::session::{PlaybackAction, PlaybackSession, PlaybackState};

use super::error::{subsystem_failure, StudioError};
use super::ports::{AudioPlayer, PlaybackStatus, StatusCallback};

/// What a playback status did to the manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackUpdate {
    /// Status for a handle that is not playing
    Ignored,
    /// Displayed position moved
    Position(Duration),
    /// The item reached its end; carries the item's name
    Finished(String),
}

/// Owns what is playing and at which position. At most one item plays.
pub struct PlaybackManager<P: AudioPlayer> {
    player: P,
    session: PlaybackSession,
    on_status: StatusCallback<PlaybackStatus>,
}

impl<P: AudioPlayer> PlaybackManager<P> {
    /// Create a manager; `on_status` is registered with every playback it starts
    pub fn new(player: P, on_status: StatusCallback<PlaybackStatus>) -> Self {
        Self {
            player,
            session: PlaybackSession::new(),
            on_status,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        self.session.state()
    }

    pub fn position(&self) -> Duration {
        self.session.position()
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing()
    }

    pub fn is_playing_handle(&self, audio: PlayableHandle) -> bool {
        self.session.is_playing_handle(audio)
    }

    /// Play `item` from the start, stopping whatever was playing first.
    pub async fn play(&mut self, item: RecordingItem) -> Result<(), StudioError> {
        if self.session.is_playing() {
            let previous = self.stop().await?;
            debug!(%previous, next = %item.audio(), "Stopped previous playback");
        }
        self.session.check(PlaybackAction::Play)?;

        self.player
            .play(item.audio(), Arc::clone(&self.on_status))
            .await
            .map_err(subsystem_failure("play"))?;

        info!(audio = %item.audio(), name = item.name(), "Playback started");
        self.session.start_playing(item)?;
        Ok(())
    }

    /// Jump within the playing item; the displayed position updates at once.
    ///
    /// The position is passed through unclamped.
    pub async fn seek(&mut self, position: Duration) -> Result<(), StudioError> {
        let audio = self.session.seek_target()?;
        let previous = self.session.position();

        self.session.set_position(position);
        if let Err(err) = self.player.seek(audio, position).await {
            self.session.set_position(previous);
            return Err(subsystem_failure("seek")(err));
        }

        debug!(%audio, %position, "Seeked");
        Ok(())
    }

    /// Stop the playing item.
    ///
    /// # Returns
    /// The handle that was playing
    pub async fn stop(&mut self) -> Result<PlayableHandle, StudioError> {
        let audio = self.session.stop_target()?;

        self.player
            .stop(audio)
            .await
            .map_err(subsystem_failure("stop playback"))?;

        self.session.stop_playing()?;
        info!(%audio, "Playback stopped");
        Ok(audio)
    }

    /// Free the audio of a removed item. Failures are logged only.
    pub async fn release(&self, audio: PlayableHandle) {
        if let Err(err) = self.player.release(audio).await {
            warn!(%audio, error = %err, "Failed to release audio");
        }
    }

    /// Apply a playback status callback.
    pub fn handle_status(&mut self, status: PlaybackStatus) -> PlaybackUpdate {
        let PlaybackState::Playing(item) = self.session.state() else {
            return PlaybackUpdate::Ignored;
        };
        if item.audio() != status.handle {
            debug!(handle = %status.handle, "Ignoring playback status");
            return PlaybackUpdate::Ignored;
        }

        if status.did_finish {
            let name = item.name().to_string();
            self.session.finish(status.handle);
            info!(audio = %status.handle, "Playback finished");
            return PlaybackUpdate::Finished(name);
        }
        if status.is_playing {
            self.session.set_position(status.position);
            return PlaybackUpdate::Position(status.position);
        }
        PlaybackUpdate::Ignored
    }
}

//! Playback state machine

use std::fmt;

use crate::domain::recording::{Duration, PlayableHandle, RecordingItem};

use super::InvalidStateTransition;

/// Playback states
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing(RecordingItem),
}

impl PlaybackState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing(_) => "playing",
        }
    }

    /// Handle of the item currently playing
    pub fn active(&self) -> Option<PlayableHandle> {
        match self {
            Self::Stopped => None,
            Self::Playing(item) => Some(item.audio()),
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    Play,
    Seek,
    Stop,
}

impl PlaybackAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Play => "start playback",
            Self::Seek => "seek",
            Self::Stop => "stop playback",
        }
    }
}

/// Playback session entity: what is playing and where.
///
/// State machine:
///   STOPPED -> PLAYING (play)
///   PLAYING -> PLAYING (seek)
///   PLAYING -> STOPPED (stop, finish)
#[derive(Debug, Default)]
pub struct PlaybackSession {
    state: PlaybackState,
    position: Duration,
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Displayed playback position
    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing(_))
    }

    /// Whether `audio` is the handle currently playing
    pub fn is_playing_handle(&self, audio: PlayableHandle) -> bool {
        self.state.active() == Some(audio)
    }

    /// Transition table; returns the active handle for seek/stop.
    pub fn check(&self, action: PlaybackAction) -> Result<Option<PlayableHandle>, InvalidStateTransition> {
        match (&self.state, action) {
            (PlaybackState::Stopped, PlaybackAction::Play) => Ok(None),
            (PlaybackState::Playing(item), PlaybackAction::Seek | PlaybackAction::Stop) => {
                Ok(Some(item.audio()))
            }
            (state, action) => Err(InvalidStateTransition {
                current_state: state.as_str(),
                action: action.as_str(),
            }),
        }
    }

    fn require_active(&self, action: PlaybackAction) -> Result<PlayableHandle, InvalidStateTransition> {
        self.check(action)?.ok_or(InvalidStateTransition {
            current_state: self.state.as_str(),
            action: action.as_str(),
        })
    }

    /// Transition from STOPPED to PLAYING at position zero
    pub fn start_playing(&mut self, item: RecordingItem) -> Result<(), InvalidStateTransition> {
        self.check(PlaybackAction::Play)?;
        self.state = PlaybackState::Playing(item);
        self.position = Duration::ZERO;
        Ok(())
    }

    /// Validate a seek and return the handle to seek
    pub fn seek_target(&self) -> Result<PlayableHandle, InvalidStateTransition> {
        self.require_active(PlaybackAction::Seek)
    }

    /// Validate a stop and return the handle to stop
    pub fn stop_target(&self) -> Result<PlayableHandle, InvalidStateTransition> {
        self.require_active(PlaybackAction::Stop)
    }

    /// Transition from PLAYING to STOPPED, resetting the position
    pub fn stop_playing(&mut self) -> Result<PlayableHandle, InvalidStateTransition> {
        let audio = self.require_active(PlaybackAction::Stop)?;
        self.state = PlaybackState::Stopped;
        self.position = Duration::ZERO;
        Ok(audio)
    }

    /// Natural end of `audio`. Ignored unless `audio` is the active item.
    pub fn finish(&mut self, audio: PlayableHandle) -> bool {
        if !self.is_playing_handle(audio) {
            return false;
        }
        self.state = PlaybackState::Stopped;
        self.position = Duration::ZERO;
        true
    }

    /// Update the displayed position
    pub fn set_position(&mut self, position: Duration) {
        self.position = position;
    }
}

//! Recording session state machine

use std::fmt;

use crate::domain::recording::CaptureHandle;

use super::InvalidStateTransition;

/// Recorder states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording(CaptureHandle),
    Paused(CaptureHandle),
}

impl RecorderState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording(_) => "recording",
            Self::Paused(_) => "paused",
        }
    }

    /// Capture owned by the current session, if any
    pub const fn capture(&self) -> Option<CaptureHandle> {
        match self {
            Self::Idle => None,
            Self::Recording(handle) | Self::Paused(handle) => Some(*handle),
        }
    }
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User commands understood by the recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderAction {
    Start,
    Pause,
    Stop,
    Discard,
}

impl RecorderAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start recording",
            Self::Pause => "pause recording",
            Self::Stop => "stop recording",
            Self::Discard => "discard recording",
        }
    }
}

/// Recording session entity.
///
/// State machine:
///   IDLE -> RECORDING (start)
///   RECORDING -> PAUSED (pause)
///   RECORDING | PAUSED -> IDLE (stop, discard)
///
/// There is no PAUSED -> RECORDING edge.
#[derive(Debug, Default)]
pub struct RecorderSession {
    state: RecorderState,
}

impl RecorderSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == RecorderState::Idle
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording(_))
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, RecorderState::Paused(_))
    }

    /// Transition table.
    ///
    /// Validates `action` against the current state without changing it and
    /// returns the capture the action operates on (`None` for start).
    pub fn check(&self, action: RecorderAction) -> Result<Option<CaptureHandle>, InvalidStateTransition> {
        use RecorderAction::*;
        use RecorderState::*;

        match (self.state, action) {
            (Idle, Start) => Ok(None),
            (Recording(handle), Pause | Stop | Discard) => Ok(Some(handle)),
            (Paused(handle), Stop | Discard) => Ok(Some(handle)),
            (state, action) => Err(InvalidStateTransition {
                current_state: state.as_str(),
                action: action.as_str(),
            }),
        }
    }

    /// Like [`check`](Self::check) for actions that need an active capture
    pub fn require_capture(&self, action: RecorderAction) -> Result<CaptureHandle, InvalidStateTransition> {
        self.check(action)?.ok_or(InvalidStateTransition {
            current_state: self.state.as_str(),
            action: action.as_str(),
        })
    }

    /// Transition from IDLE to RECORDING
    pub fn start_recording(&mut self, capture: CaptureHandle) -> Result<(), InvalidStateTransition> {
        self.check(RecorderAction::Start)?;
        self.state = RecorderState::Recording(capture);
        Ok(())
    }

    /// Transition from RECORDING to PAUSED
    pub fn pause_recording(&mut self) -> Result<CaptureHandle, InvalidStateTransition> {
        let capture = self.require_capture(RecorderAction::Pause)?;
        self.state = RecorderState::Paused(capture);
        Ok(capture)
    }

    /// Transition from RECORDING or PAUSED to IDLE, keeping the audio
    pub fn stop_recording(&mut self) -> Result<CaptureHandle, InvalidStateTransition> {
        let capture = self.require_capture(RecorderAction::Stop)?;
        self.state = RecorderState::Idle;
        Ok(capture)
    }

    /// Transition from RECORDING or PAUSED to IDLE, dropping the audio
    pub fn discard_recording(&mut self) -> Result<CaptureHandle, InvalidStateTransition> {
        let capture = self.require_capture(RecorderAction::Discard)?;
        self.state = RecorderState::Idle;
        Ok(capture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURE: CaptureHandle = CaptureHandle::new(7);

    fn recording() -> RecorderSession {
        let mut session = RecorderSession::new();
        session.start_recording(CAPTURE).unwrap();
        session
    }

    #[test]
    fn new_session_is_idle() {
        let session = RecorderSession::new();
        assert!(session.is_idle());
        assert!(!session.is_recording());
        assert!(!session.is_paused());
        assert_eq!(session.state().capture(), None);
    }

    #[test]
    fn start_from_idle() {
        let session = recording();
        assert!(session.is_recording());
        assert_eq!(session.state(), RecorderState::Recording(CAPTURE));
    }

    #[test]
    fn start_while_recording_fails() {
        let mut session = recording();
        let err = session.start_recording(CaptureHandle::new(8)).unwrap_err();
        assert_eq!(err.current_state, "recording");
        assert!(err.action.contains("start recording"));
        assert_eq!(session.state(), RecorderState::Recording(CAPTURE));
    }

    #[test]
    fn start_while_paused_fails() {
        let mut session = recording();
        session.pause_recording().unwrap();
        assert!(session.start_recording(CaptureHandle::new(8)).is_err());
        assert!(session.is_paused());
    }

    #[test]
    fn pause_from_recording() {
        let mut session = recording();
        assert_eq!(session.pause_recording().unwrap(), CAPTURE);
        assert_eq!(session.state(), RecorderState::Paused(CAPTURE));
    }

    #[test]
    fn pause_twice_fails() {
        let mut session = recording();
        session.pause_recording().unwrap();
        let err = session.pause_recording().unwrap_err();
        assert_eq!(err.current_state, "paused");
    }

    #[test]
    fn pause_from_idle_fails() {
        let mut session = RecorderSession::new();
        assert!(session.pause_recording().is_err());
    }

    #[test]
    fn stop_from_recording_and_paused() {
        let mut session = recording();
        assert_eq!(session.stop_recording().unwrap(), CAPTURE);
        assert!(session.is_idle());

        let mut session = recording();
        session.pause_recording().unwrap();
        assert_eq!(session.stop_recording().unwrap(), CAPTURE);
        assert!(session.is_idle());
    }

    #[test]
    fn stop_from_idle_fails() {
        let mut session = RecorderSession::new();
        let err = session.stop_recording().unwrap_err();
        assert_eq!(err.current_state, "idle");
    }

    #[test]
    fn discard_returns_to_idle() {
        let mut session = recording();
        assert_eq!(session.discard_recording().unwrap(), CAPTURE);
        assert!(session.is_idle());
    }

    #[test]
    fn discard_from_idle_fails() {
        let mut session = RecorderSession::new();
        assert!(session.discard_recording().is_err());
    }

    #[test]
    fn check_does_not_mutate() {
        let session = recording();
        assert_eq!(session.check(RecorderAction::Stop).unwrap(), Some(CAPTURE));
        assert!(session.check(RecorderAction::Start).is_err());
        assert!(session.is_recording());
    }

    #[test]
    fn full_cycle() {
        let mut session = RecorderSession::new();
        session.start_recording(CAPTURE).unwrap();
        session.pause_recording().unwrap();
        session.stop_recording().unwrap();
        assert!(session.is_idle());

        // Can start another cycle
        session.start_recording(CaptureHandle::new(9)).unwrap();
        assert!(session.is_recording());
    }

    #[test]
    fn state_display() {
        assert_eq!(RecorderState::Idle.to_string(), "idle");
        assert_eq!(RecorderState::Recording(CAPTURE).to_string(), "recording");
        assert_eq!(RecorderState::Paused(CAPTURE).to_string(), "paused");
    }
}

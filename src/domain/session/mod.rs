//! Recorder and playback state machines

mod playback;
mod recorder;

use thiserror::Error;

pub use playback::{PlaybackAction, PlaybackSession, PlaybackState};
pub use recorder::{RecorderAction, RecorderSession, RecorderState};

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: &'static str,
    pub action: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: "paused",
            action: "pause recording",
        };
        assert_eq!(
            err.to_string(),
            "Invalid state transition: cannot pause recording while paused"
        );
    }
}

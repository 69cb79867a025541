//! Application error taxonomy

use thiserror::Error;
use tracing::error;

use crate::domain::error::InvalidIndex;
use crate::domain::session::InvalidStateTransition;

use super::ports::AudioError;

/// Errors from recorder, playback and collection operations.
///
/// All variants are recoverable: the state machines are left at their
/// pre-call values.
#[derive(Debug, Clone, Error)]
pub enum StudioError {
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Audio subsystem failure: {0}")]
    Subsystem(#[from] AudioError),

    #[error(transparent)]
    InvalidIndex(#[from] InvalidIndex),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
}

/// Log a failed subsystem call and wrap it.
pub(crate) fn subsystem_failure(operation: &'static str) -> impl FnOnce(AudioError) -> StudioError {
    move |err| {
        error!(operation, error = %err, "Audio subsystem call failed");
        StudioError::Subsystem(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsystem_failure_wraps_error() {
        let err = subsystem_failure("play")(AudioError::NoAudioDevice);
        assert!(matches!(err, StudioError::Subsystem(AudioError::NoAudioDevice)));
        assert!(err.to_string().contains("No audio device"));
    }

    #[test]
    fn invalid_index_is_transparent() {
        let err = StudioError::from(InvalidIndex { index: 5, len: 1 });
        assert_eq!(err.to_string(), InvalidIndex { index: 5, len: 1 }.to_string());
    }
}

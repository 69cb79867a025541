//! Silent audio cue, used with `--no-cues` or `audio_cues = false`

use async_trait::async_trait;
use tracing::trace;

use crate::application::ports::{AudioCue, AudioCueError, AudioCueType};

#[derive(Debug, Default)]
pub struct NoOpAudioCue;

impl NoOpAudioCue {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioCue for NoOpAudioCue {
    async fn play(&self, cue_type: AudioCueType) -> Result<(), AudioCueError> {
        trace!(?cue_type, "Audio cue skipped");
        Ok(())
    }
}

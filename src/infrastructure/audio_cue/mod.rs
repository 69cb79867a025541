//! Audio cue infrastructure adapters
//!
//! Chimes when a recording starts, is saved, or is discarded.

mod noop;
mod rodio_cue;

use std::sync::Arc;

pub use noop::NoOpAudioCue;
pub use rodio_cue::RodioAudioCue;

use crate::application::ports::AudioCue;

/// Create the cue adapter; silent when cues are disabled
pub fn create_audio_cue(enabled: bool) -> Arc<dyn AudioCue> {
    if enabled {
        Arc::new(RodioAudioCue::new())
    } else {
        Arc::new(NoOpAudioCue::new())
    }
}

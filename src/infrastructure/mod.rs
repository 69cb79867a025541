//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the port interfaces: audio capture and
//! playback, audio cues, and the config file.

pub mod audio;
pub mod audio_cue;
pub mod config;

// Re-export adapters
pub use audio::{create_audio, AudioBackend, AudioSettings, CpalAudio, SimulatedAudio};
pub use audio_cue::{create_audio_cue, NoOpAudioCue, RodioAudioCue};
pub use config::XdgConfigStore;

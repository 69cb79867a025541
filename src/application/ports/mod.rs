//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod audio;
pub mod audio_cue;
pub mod config;
pub mod player;
pub mod recorder;

// Re-export common types
pub use audio::{AudioError, StatusCallback};
pub use audio_cue::{AudioCue, AudioCueError, AudioCueType};
pub use config::ConfigStore;
pub use player::{AudioPlayer, PlaybackStatus};
pub use recorder::{AudioMode, AudioRecorder, CaptureStatus, FinalizedCapture, Permission};

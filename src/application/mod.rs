//! Application layer - Use cases and port interfaces
//!
//! Contains the recorder and playback use cases, the studio that ties them
//! to the recordings list, and the trait definitions for the audio subsystem.

pub mod error;
pub mod playback;
pub mod ports;
pub mod recording_session;
pub mod studio;

#[cfg(test)]
pub(crate) mod testing;

// Re-export use cases
pub use error::StudioError;
pub use playback::{PlaybackManager, PlaybackUpdate};
pub use recording_session::RecordingSessionManager;
pub use studio::{AudioEvent, Studio, StudioConfig, StudioUpdate};

//! Finished recording entry

use std::fmt;

use super::{Duration, PlayableHandle};

/// A named, finalized recording.
///
/// Only `name` changes after creation (rename); everything else is fixed
/// when the capture is finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingItem {
    name: String,
    audio: PlayableHandle,
    duration: Duration,
    file_uri: String,
}

impl RecordingItem {
    pub fn new(
        name: impl Into<String>,
        audio: PlayableHandle,
        duration: Duration,
        file_uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            audio,
            duration,
            file_uri: file_uri.into(),
        }
    }

    /// Default name for the item at 1-based position `ordinal`
    pub fn default_name(ordinal: usize) -> String {
        format!("Recording #{}", ordinal)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn audio(&self) -> PlayableHandle {
        self.audio
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn file_uri(&self) -> &str {
        &self.file_uri
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl fmt::Display for RecordingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.name, self.duration.format_clock())
    }
}

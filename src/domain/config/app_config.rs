//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::Duration;

/// Default audio backend name
pub const DEFAULT_BACKEND: &str = "cpal";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Audio backend: "cpal" (hardware) or "simulated"
    pub backend: Option<String>,
    /// Directory for finished recording files
    pub recordings_dir: Option<String>,
    /// Safety limit after which a recording is stopped automatically
    pub max_duration: Option<String>,
    /// Cadence of capture/playback status updates
    pub status_interval: Option<String>,
    /// Play chimes on start/stop/discard
    pub audio_cues: Option<bool>,
    /// Stop playback when the playing item is deleted or the list is cleared
    pub stop_playback_on_delete: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            backend: Some(DEFAULT_BACKEND.to_string()),
            recordings_dir: None,
            max_duration: Some(Duration::default_max_duration().to_string()),
            status_interval: Some(Duration::default_status_interval().to_string()),
            audio_cues: Some(true),
            stop_playback_on_delete: Some(true),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            backend: other.backend.or(self.backend),
            recordings_dir: other.recordings_dir.or(self.recordings_dir),
            max_duration: other.max_duration.or(self.max_duration),
            status_interval: other.status_interval.or(self.status_interval),
            audio_cues: other.audio_cues.or(self.audio_cues),
            stop_playback_on_delete: other
                .stop_playback_on_delete
                .or(self.stop_playback_on_delete),
        }
    }

    /// Get backend name, or "cpal" if not set
    pub fn backend_or_default(&self) -> &str {
        self.backend.as_deref().unwrap_or(DEFAULT_BACKEND)
    }

    /// Recordings directory, or the user cache directory
    pub fn recordings_dir_or_default(&self) -> PathBuf {
        match self.recordings_dir.as_deref() {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("voice-recorder"),
        }
    }

    /// Get max_duration as parsed Duration, or default if not set/invalid
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_duration)
    }

    /// Get status_interval as parsed Duration, or default if not set/invalid
    pub fn status_interval_or_default(&self) -> Duration {
        self.status_interval
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_status_interval)
    }

    pub fn audio_cues_or_default(&self) -> bool {
        self.audio_cues.unwrap_or(true)
    }

    pub fn stop_playback_on_delete_or_default(&self) -> bool {
        self.stop_playback_on_delete.unwrap_or(true)
    }
}

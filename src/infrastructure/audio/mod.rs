//! Audio infrastructure module
//!
//! Provides capture and playback using cpal/rodio (hardware) or a simulated
//! clock (no devices). Finalized recordings are stored as FLAC files.

mod cpal_audio;
mod flac_encoder;
mod simulated;
mod store;

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

pub use cpal_audio::CpalAudio;
pub use flac_encoder::{encode_to_flac, EncodingError, DEFAULT_SAMPLE_RATE};
pub use simulated::SimulatedAudio;
pub use store::{AudioClip, RecordingStore};

use crate::application::ports::{
    AudioError, AudioMode, AudioPlayer, AudioRecorder, CaptureStatus, FinalizedCapture,
    Permission, PlaybackStatus, StatusCallback,
};
use crate::domain::recording::{CaptureHandle, Duration, PlayableHandle};

/// Settings shared by the audio adapters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSettings {
    /// Where finalized recordings are written
    pub recordings_dir: PathBuf,
    /// Cadence of capture and playback status callbacks
    pub status_interval: Duration,
}

/// Lock a registry mutex, recovering from poisoning
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Audio backend selected at runtime
#[derive(Clone)]
pub enum AudioBackend {
    Cpal(CpalAudio),
    Simulated(SimulatedAudio),
}

impl AudioBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cpal(_) => "cpal",
            Self::Simulated(_) => "simulated",
        }
    }
}

/// Create the backend named by `backend` (`cpal` or `simulated`)
pub fn create_audio(backend: &str, settings: AudioSettings) -> Result<AudioBackend, AudioError> {
    match backend {
        "cpal" => Ok(AudioBackend::Cpal(CpalAudio::new(settings))),
        "simulated" => Ok(AudioBackend::Simulated(SimulatedAudio::new(settings))),
        other => Err(AudioError::CaptureFailed(format!(
            "Unknown audio backend '{}'. Valid backends: cpal, simulated",
            other
        ))),
    }
}

macro_rules! delegate {
    ($self:ident, $audio:ident => $call:expr) => {
        match $self {
            AudioBackend::Cpal($audio) => $call,
            AudioBackend::Simulated($audio) => $call,
        }
    };
}

#[async_trait]
impl AudioRecorder for AudioBackend {
    async fn request_recording_permission(&self) -> Result<Permission, AudioError> {
        delegate!(self, audio => audio.request_recording_permission().await)
    }

    async fn configure_audio_mode(&self, mode: AudioMode) -> Result<(), AudioError> {
        delegate!(self, audio => audio.configure_audio_mode(mode).await)
    }

    async fn begin_capture(
        &self,
        on_status: StatusCallback<CaptureStatus>,
    ) -> Result<CaptureHandle, AudioError> {
        delegate!(self, audio => audio.begin_capture(on_status).await)
    }

    async fn pause_capture(&self, handle: CaptureHandle) -> Result<(), AudioError> {
        delegate!(self, audio => audio.pause_capture(handle).await)
    }

    async fn finalize_capture(&self, handle: CaptureHandle) -> Result<FinalizedCapture, AudioError> {
        delegate!(self, audio => audio.finalize_capture(handle).await)
    }

    async fn discard_capture(&self, handle: CaptureHandle) -> Result<(), AudioError> {
        delegate!(self, audio => audio.discard_capture(handle).await)
    }
}

#[async_trait]
impl AudioPlayer for AudioBackend {
    async fn play(
        &self,
        handle: PlayableHandle,
        on_status: StatusCallback<PlaybackStatus>,
    ) -> Result<(), AudioError> {
        delegate!(self, audio => audio.play(handle, on_status).await)
    }

    async fn seek(&self, handle: PlayableHandle, position: Duration) -> Result<(), AudioError> {
        delegate!(self, audio => audio.seek(handle, position).await)
    }

    async fn stop(&self, handle: PlayableHandle) -> Result<(), AudioError> {
        delegate!(self, audio => audio.stop(handle).await)
    }

    async fn release(&self, handle: PlayableHandle) -> Result<(), AudioError> {
        delegate!(self, audio => audio.release(handle).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AudioSettings {
        AudioSettings {
            recordings_dir: std::env::temp_dir(),
            status_interval: Duration::default_status_interval(),
        }
    }

    #[test]
    fn create_known_backends() {
        assert_eq!(create_audio("cpal", settings()).unwrap().name(), "cpal");
        assert_eq!(
            create_audio("simulated", settings()).unwrap().name(),
            "simulated"
        );
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(create_audio("alsa", settings()).is_err());
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let mutex = std::sync::Arc::new(Mutex::new(1));
        let poisoner = std::sync::Arc::clone(&mutex);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison");
        })
        .join();

        assert_eq!(*lock(&mutex), 1);
    }
}

//! Scriptable audio ports for use-case tests

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::recording::{CaptureHandle, Duration, PlayableHandle};

use super::ports::{
    AudioCue, AudioCueError, AudioCueType, AudioError, AudioMode, AudioPlayer, AudioRecorder,
    CaptureStatus, FinalizedCapture, Permission, PlaybackStatus, StatusCallback,
};

#[derive(Default)]
struct MockState {
    calls: Vec<String>,
    failing: HashSet<&'static str>,
    deny_permission: bool,
    next_id: u64,
    capture_duration: Option<Duration>,
}

/// Records every port call; individual operations can be made to fail.
#[derive(Clone, Default)]
pub(crate) struct MockAudio {
    state: Arc<Mutex<MockState>>,
}

impl MockAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deny_permission(&self) {
        self.state.lock().unwrap().deny_permission = true;
    }

    pub fn fail(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.remove(operation);
    }

    pub fn set_capture_duration(&self, duration: Duration) {
        self.state.lock().unwrap().capture_duration = Some(duration);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, operation: &'static str, detail: String) -> Result<(), AudioError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(if detail.is_empty() {
            operation.to_string()
        } else {
            format!("{} {}", operation, detail)
        });
        if state.failing.contains(operation) {
            return Err(AudioError::CaptureFailed(format!("{} failed", operation)));
        }
        Ok(())
    }

    fn next_id(&self) -> u64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        state.next_id
    }
}

#[async_trait]
impl AudioRecorder for MockAudio {
    async fn request_recording_permission(&self) -> Result<Permission, AudioError> {
        self.record("permission", String::new())?;
        if self.state.lock().unwrap().deny_permission {
            Ok(Permission::Denied)
        } else {
            Ok(Permission::Granted)
        }
    }

    async fn configure_audio_mode(&self, _mode: AudioMode) -> Result<(), AudioError> {
        self.record("configure", String::new())
    }

    async fn begin_capture(
        &self,
        _on_status: StatusCallback<CaptureStatus>,
    ) -> Result<CaptureHandle, AudioError> {
        self.record("begin", String::new())?;
        Ok(CaptureHandle::new(self.next_id()))
    }

    async fn pause_capture(&self, handle: CaptureHandle) -> Result<(), AudioError> {
        self.record("pause", handle.to_string())
    }

    async fn finalize_capture(&self, handle: CaptureHandle) -> Result<FinalizedCapture, AudioError> {
        self.record("finalize", handle.to_string())?;
        let duration = self
            .state
            .lock()
            .unwrap()
            .capture_duration
            .unwrap_or(Duration::from_millis(3_200));
        Ok(FinalizedCapture {
            audio: PlayableHandle::new(handle.id() + 100),
            duration,
            file_uri: format!("file:///tmp/mock-{}.flac", handle.id()),
        })
    }

    async fn discard_capture(&self, handle: CaptureHandle) -> Result<(), AudioError> {
        self.record("discard", handle.to_string())
    }
}

#[async_trait]
impl AudioPlayer for MockAudio {
    async fn play(
        &self,
        handle: PlayableHandle,
        _on_status: StatusCallback<PlaybackStatus>,
    ) -> Result<(), AudioError> {
        self.record("play", handle.to_string())
    }

    async fn seek(&self, handle: PlayableHandle, position: Duration) -> Result<(), AudioError> {
        self.record("seek", format!("{} {}", handle, position))
    }

    async fn stop(&self, handle: PlayableHandle) -> Result<(), AudioError> {
        self.record("stop", handle.to_string())
    }

    async fn release(&self, handle: PlayableHandle) -> Result<(), AudioError> {
        self.record("release", handle.to_string())
    }
}

/// Audio cue that remembers what it played
#[derive(Clone, Default)]
pub(crate) struct MockCue {
    played: Arc<Mutex<Vec<AudioCueType>>>,
}

impl MockCue {
    pub fn played(&self) -> Vec<AudioCueType> {
        self.played.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioCue for MockCue {
    async fn play(&self, cue_type: AudioCueType) -> Result<(), AudioCueError> {
        self.played.lock().unwrap().push(cue_type);
        Ok(())
    }
}

/// Callback that drops every status
pub(crate) fn ignore<T: 'static>() -> StatusCallback<T> {
    Arc::new(|_| {})
}

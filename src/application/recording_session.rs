//! Recording session manager use case

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::recording::{CaptureHandle, Duration, RecordingCollection};
use crate::domain::session::{RecorderAction, RecorderSession, RecorderState};

use super::error::{subsystem_failure, StudioError};
use super::ports::{AudioMode, AudioRecorder, CaptureStatus, Permission, StatusCallback};

/// Owns the idle/recording/paused lifecycle and turns a stopped capture into
/// a [`RecordingItem`](crate::domain::recording::RecordingItem).
///
/// Every operation validates the transition first, then calls the audio
/// subsystem, and only commits the new state once the call succeeded.
pub struct RecordingSessionManager<R: AudioRecorder> {
    recorder: R,
    session: RecorderSession,
    elapsed: Duration,
    on_status: StatusCallback<CaptureStatus>,
}

impl<R: AudioRecorder> RecordingSessionManager<R> {
    /// Create a manager; `on_status` is registered with every capture it begins
    pub fn new(recorder: R, on_status: StatusCallback<CaptureStatus>) -> Self {
        Self {
            recorder,
            session: RecorderSession::new(),
            elapsed: Duration::ZERO,
            on_status,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.session.state()
    }

    /// Elapsed time of the active capture, as last reported by the subsystem
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    /// Request permission, configure the audio mode and begin capturing.
    pub async fn start(&mut self) -> Result<CaptureHandle, StudioError> {
        self.session.check(RecorderAction::Start)?;

        let permission = self
            .recorder
            .request_recording_permission()
            .await
            .map_err(subsystem_failure("request recording permission"))?;
        if permission == Permission::Denied {
            warn!("Microphone permission denied, staying idle");
            return Err(StudioError::PermissionDenied);
        }

        self.recorder
            .configure_audio_mode(AudioMode::recording())
            .await
            .map_err(subsystem_failure("configure audio mode"))?;

        let capture = self
            .recorder
            .begin_capture(Arc::clone(&self.on_status))
            .await
            .map_err(subsystem_failure("begin capture"))?;

        self.session.start_recording(capture)?;
        self.elapsed = Duration::ZERO;
        info!(%capture, "Recording started");
        Ok(capture)
    }

    /// Pause the active capture. There is no resume.
    pub async fn pause(&mut self) -> Result<(), StudioError> {
        let capture = self.session.require_capture(RecorderAction::Pause)?;

        self.recorder
            .pause_capture(capture)
            .await
            .map_err(subsystem_failure("pause capture"))?;

        self.session.pause_recording()?;
        info!(%capture, elapsed = %self.elapsed, "Recording paused");
        Ok(())
    }

    /// Finalize the capture and append it to `recordings`.
    ///
    /// # Returns
    /// The index of the new item
    pub async fn stop(&mut self, recordings: &mut RecordingCollection) -> Result<usize, StudioError> {
        let capture = self.session.require_capture(RecorderAction::Stop)?;

        let finalized = self
            .recorder
            .finalize_capture(capture)
            .await
            .map_err(subsystem_failure("finalize capture"))?;

        self.session.stop_recording()?;
        self.elapsed = Duration::ZERO;

        let index = recordings.append(finalized.audio, finalized.duration, finalized.file_uri);
        info!(
            %capture,
            audio = %finalized.audio,
            duration = %finalized.duration,
            index,
            "Recording saved"
        );
        Ok(index)
    }

    /// Drop the active capture without creating an item.
    pub async fn discard(&mut self) -> Result<(), StudioError> {
        let capture = self.session.require_capture(RecorderAction::Discard)?;

        self.recorder
            .discard_capture(capture)
            .await
            .map_err(subsystem_failure("discard capture"))?;

        self.session.discard_recording()?;
        self.elapsed = Duration::ZERO;
        info!(%capture, "Recording discarded");
        Ok(())
    }

    /// Apply a capture status callback.
    ///
    /// Statuses from captures that are no longer active, or that report the
    /// capture as not recording, are ignored.
    ///
    /// # Returns
    /// Whether the displayed elapsed time changed
    pub fn handle_status(&mut self, status: CaptureStatus) -> bool {
        if self.session.state().capture() != Some(status.handle) || !status.is_recording {
            debug!(handle = %status.handle, "Ignoring capture status");
            return false;
        }
        self.elapsed = status.elapsed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::AudioError;
    use crate::application::testing::{ignore, MockAudio};

    fn manager(audio: &MockAudio) -> RecordingSessionManager<MockAudio> {
        RecordingSessionManager::new(audio.clone(), ignore())
    }

    fn status(handle: CaptureHandle, elapsed_ms: u64, is_recording: bool) -> CaptureStatus {
        CaptureStatus {
            handle,
            elapsed: Duration::from_millis(elapsed_ms),
            is_recording,
        }
    }

    #[tokio::test]
    async fn start_requests_permission_then_configures_then_begins() {
        let audio = MockAudio::new();
        let mut manager = manager(&audio);

        let capture = manager.start().await.unwrap();
        assert_eq!(manager.state(), RecorderState::Recording(capture));
        assert_eq!(audio.calls(), vec!["permission", "configure", "begin"]);
    }

    #[tokio::test]
    async fn permission_denied_stays_idle() {
        let audio = MockAudio::new();
        audio.deny_permission();
        let mut manager = manager(&audio);

        let err = manager.start().await.unwrap_err();
        assert!(matches!(err, StudioError::PermissionDenied));
        assert_eq!(manager.state(), RecorderState::Idle);
        assert_eq!(audio.calls(), vec!["permission"]);
    }

    #[tokio::test]
    async fn begin_failure_stays_idle() {
        let audio = MockAudio::new();
        audio.fail("begin");
        let mut manager = manager(&audio);

        let err = manager.start().await.unwrap_err();
        assert!(matches!(err, StudioError::Subsystem(AudioError::CaptureFailed(_))));
        assert_eq!(manager.state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn start_twice_is_rejected_before_touching_audio() {
        let audio = MockAudio::new();
        let mut manager = manager(&audio);
        manager.start().await.unwrap();
        audio.clear_calls();

        let err = manager.start().await.unwrap_err();
        assert!(matches!(err, StudioError::InvalidState(_)));
        assert!(audio.calls().is_empty());
    }

    #[tokio::test]
    async fn stop_appends_named_item_and_resets_elapsed() {
        let audio = MockAudio::new();
        let mut manager = manager(&audio);
        let mut recordings = RecordingCollection::new();

        let capture = manager.start().await.unwrap();
        manager.handle_status(status(capture, 1_500, true));
        assert_eq!(manager.elapsed().as_millis(), 1_500);

        let index = manager.stop(&mut recordings).await.unwrap();
        assert_eq!(index, 0);
        assert_eq!(recordings.len(), 1);
        assert_eq!(recordings.get(0).unwrap().name(), "Recording #1");
        assert_eq!(manager.elapsed(), Duration::ZERO);
        assert_eq!(manager.state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn stop_from_paused() {
        let audio = MockAudio::new();
        let mut manager = manager(&audio);
        let mut recordings = RecordingCollection::new();

        manager.start().await.unwrap();
        manager.pause().await.unwrap();
        assert!(matches!(manager.state(), RecorderState::Paused(_)));

        manager.stop(&mut recordings).await.unwrap();
        assert_eq!(recordings.len(), 1);
    }

    #[tokio::test]
    async fn finalize_failure_keeps_session() {
        let audio = MockAudio::new();
        let mut manager = manager(&audio);
        let mut recordings = RecordingCollection::new();

        let capture = manager.start().await.unwrap();
        audio.fail("finalize");
        assert!(manager.stop(&mut recordings).await.is_err());
        assert_eq!(manager.state(), RecorderState::Recording(capture));
        assert!(recordings.is_empty());

        audio.recover("finalize");
        manager.stop(&mut recordings).await.unwrap();
        assert_eq!(recordings.len(), 1);
    }

    #[tokio::test]
    async fn discard_never_appends() {
        let audio = MockAudio::new();
        let mut manager = manager(&audio);
        let recordings = RecordingCollection::new();

        let capture = manager.start().await.unwrap();
        manager.handle_status(status(capture, 9_000, true));
        manager.discard().await.unwrap();

        assert!(recordings.is_empty());
        assert_eq!(manager.state(), RecorderState::Idle);
        assert_eq!(manager.elapsed(), Duration::ZERO);
        assert!(audio.calls().contains(&format!("discard {}", capture)));
    }

    #[tokio::test]
    async fn pause_from_idle_is_rejected() {
        let audio = MockAudio::new();
        let mut manager = manager(&audio);
        assert!(matches!(
            manager.pause().await.unwrap_err(),
            StudioError::InvalidState(_)
        ));
    }

    #[tokio::test]
    async fn status_for_stale_capture_is_ignored() {
        let audio = MockAudio::new();
        let mut manager = manager(&audio);
        let mut recordings = RecordingCollection::new();

        let first = manager.start().await.unwrap();
        manager.stop(&mut recordings).await.unwrap();
        let second = manager.start().await.unwrap();

        assert!(!manager.handle_status(status(first, 5_000, true)));
        assert_eq!(manager.elapsed(), Duration::ZERO);
        assert!(!manager.handle_status(status(second, 5_000, false)));
        assert!(manager.handle_status(status(second, 700, true)));
        assert_eq!(manager.elapsed().as_millis(), 700);
    }
}

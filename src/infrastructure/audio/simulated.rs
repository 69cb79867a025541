//! Hardware-free audio adapter
//!
//! Captures silence against the wall clock and "plays" clips by advancing a
//! clock, reporting status the same way the hardware adapter does. Saved
//! recordings are real FLAC files.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::flac_encoder::DEFAULT_SAMPLE_RATE;
use super::store::{AudioClip, RecordingStore};
use super::{lock, AudioSettings};
use crate::application::ports::{
    AudioError, AudioMode, AudioPlayer, AudioRecorder, CaptureStatus, FinalizedCapture,
    Permission, PlaybackStatus, StatusCallback,
};
use crate::domain::recording::{CaptureHandle, Duration, PlayableHandle};

/// Elapsed time that only advances while running
#[derive(Debug, Default)]
struct PausableClock {
    accumulated: std::time::Duration,
    running_since: Option<Instant>,
}

impl PausableClock {
    fn started() -> Self {
        Self {
            accumulated: std::time::Duration::ZERO,
            running_since: Some(Instant::now()),
        }
    }

    fn elapsed(&self) -> Duration {
        let running = self
            .running_since
            .map(|since| since.elapsed())
            .unwrap_or_default();
        Duration::from_std(self.accumulated + running)
    }

    fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }
}

struct ActiveCapture {
    clock: Arc<Mutex<PausableClock>>,
    ticker: JoinHandle<()>,
}

enum PlayerCommand {
    Seek(Duration),
    Stop,
}

struct Inner {
    settings: AudioSettings,
    store: RecordingStore,
    next_id: AtomicU64,
    mode: Mutex<AudioMode>,
    captures: Mutex<HashMap<CaptureHandle, ActiveCapture>>,
    clips: Mutex<HashMap<PlayableHandle, AudioClip>>,
    playbacks: Mutex<HashMap<PlayableHandle, mpsc::UnboundedSender<PlayerCommand>>>,
}

/// Audio adapter that needs no devices.
///
/// Clones share state, like [`CpalAudio`](super::CpalAudio).
#[derive(Clone)]
pub struct SimulatedAudio {
    inner: Arc<Inner>,
}

impl SimulatedAudio {
    pub fn new(settings: AudioSettings) -> Self {
        let store = RecordingStore::new(settings.recordings_dir.clone());
        Self {
            inner: Arc::new(Inner {
                settings,
                store,
                next_id: AtomicU64::new(1),
                mode: Mutex::new(AudioMode::default()),
                captures: Mutex::new(HashMap::new()),
                clips: Mutex::new(HashMap::new()),
                playbacks: Mutex::new(HashMap::new()),
            }),
        }
    }

    fn next_id(&self) -> u64 {
        self.inner.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn end_capture(&self, handle: CaptureHandle) -> Result<Duration, AudioError> {
        let capture = lock(&self.inner.captures)
            .remove(&handle)
            .ok_or_else(|| AudioError::UnknownHandle(handle.to_string()))?;
        capture.ticker.abort();

        let mut clock = lock(&capture.clock);
        clock.pause();
        Ok(clock.elapsed())
    }

    async fn run_playback(
        clip: AudioClip,
        handle: PlayableHandle,
        on_status: StatusCallback<PlaybackStatus>,
        interval: std::time::Duration,
        mut commands: mpsc::UnboundedReceiver<PlayerCommand>,
    ) {
        let total = clip.duration();
        let mut offset = Duration::ZERO;
        let mut started = Instant::now();
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(PlayerCommand::Seek(position)) => {
                        offset = position;
                        started = Instant::now();
                    }
                    Some(PlayerCommand::Stop) | None => {
                        debug!(%handle, "Simulated playback stopped");
                        return;
                    }
                },
                _ = ticker.tick() => {}
            }

            let position = Duration::from_millis(
                offset.as_millis() + started.elapsed().as_millis() as u64,
            );
            if position >= total {
                on_status(PlaybackStatus {
                    handle,
                    position: total,
                    is_playing: false,
                    did_finish: true,
                });
                debug!(%handle, "Simulated playback finished");
                return;
            }
            on_status(PlaybackStatus {
                handle,
                position,
                is_playing: true,
                did_finish: false,
            });
        }
    }
}

#[async_trait]
impl AudioRecorder for SimulatedAudio {
    async fn request_recording_permission(&self) -> Result<Permission, AudioError> {
        Ok(Permission::Granted)
    }

    async fn configure_audio_mode(&self, mode: AudioMode) -> Result<(), AudioError> {
        *lock(&self.inner.mode) = mode;
        Ok(())
    }

    async fn begin_capture(
        &self,
        on_status: StatusCallback<CaptureStatus>,
    ) -> Result<CaptureHandle, AudioError> {
        if !lock(&self.inner.mode).allow_recording {
            return Err(AudioError::RecordingDisabled);
        }

        let handle = CaptureHandle::new(self.next_id());
        let clock = Arc::new(Mutex::new(PausableClock::started()));
        let interval = self.inner.settings.status_interval.as_std();

        let ticker_clock = Arc::clone(&clock);
        let ticker = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let (running, elapsed) = {
                    let clock = lock(&ticker_clock);
                    (clock.is_running(), clock.elapsed())
                };
                if running {
                    on_status(CaptureStatus {
                        handle,
                        elapsed,
                        is_recording: true,
                    });
                }
            }
        });

        lock(&self.inner.captures).insert(handle, ActiveCapture { clock, ticker });
        info!(%handle, "Simulated capture started");
        Ok(handle)
    }

    async fn pause_capture(&self, handle: CaptureHandle) -> Result<(), AudioError> {
        let captures = lock(&self.inner.captures);
        let capture = captures
            .get(&handle)
            .ok_or_else(|| AudioError::UnknownHandle(handle.to_string()))?;
        lock(&capture.clock).pause();
        Ok(())
    }

    async fn finalize_capture(&self, handle: CaptureHandle) -> Result<FinalizedCapture, AudioError> {
        let elapsed = self.end_capture(handle)?;
        let sample_count = (elapsed.as_millis() * DEFAULT_SAMPLE_RATE as u64 / 1000) as usize;
        let clip = AudioClip::new(vec![0; sample_count], DEFAULT_SAMPLE_RATE);

        let file_uri = self.inner.store.save(&clip).await?;
        let duration = clip.duration();
        let audio = PlayableHandle::new(self.next_id());
        lock(&self.inner.clips).insert(audio, clip);

        info!(%handle, %audio, %duration, "Simulated capture finalized");
        Ok(FinalizedCapture {
            audio,
            duration,
            file_uri,
        })
    }

    async fn discard_capture(&self, handle: CaptureHandle) -> Result<(), AudioError> {
        match self.end_capture(handle) {
            Ok(_) | Err(AudioError::UnknownHandle(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl AudioPlayer for SimulatedAudio {
    async fn play(
        &self,
        handle: PlayableHandle,
        on_status: StatusCallback<PlaybackStatus>,
    ) -> Result<(), AudioError> {
        let clip = lock(&self.inner.clips)
            .get(&handle)
            .cloned()
            .ok_or_else(|| AudioError::UnknownHandle(handle.to_string()))?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        if let Some(previous) = lock(&self.inner.playbacks).insert(handle, command_tx) {
            let _ = previous.send(PlayerCommand::Stop);
        }

        let interval = self.inner.settings.status_interval.as_std();
        tokio::spawn(Self::run_playback(clip, handle, on_status, interval, command_rx));
        Ok(())
    }

    async fn seek(&self, handle: PlayableHandle, position: Duration) -> Result<(), AudioError> {
        let playbacks = lock(&self.inner.playbacks);
        let commands = playbacks
            .get(&handle)
            .ok_or_else(|| AudioError::UnknownHandle(handle.to_string()))?;
        commands
            .send(PlayerCommand::Seek(position))
            .map_err(|_| AudioError::PlaybackFailed("Playback already ended".into()))
    }

    async fn stop(&self, handle: PlayableHandle) -> Result<(), AudioError> {
        if let Some(commands) = lock(&self.inner.playbacks).remove(&handle) {
            let _ = commands.send(PlayerCommand::Stop);
        }
        Ok(())
    }

    async fn release(&self, handle: PlayableHandle) -> Result<(), AudioError> {
        if let Some(commands) = lock(&self.inner.playbacks).remove(&handle) {
            let _ = commands.send(PlayerCommand::Stop);
        }
        if lock(&self.inner.clips).remove(&handle).is_none() {
            return Err(AudioError::UnknownHandle(handle.to_string()));
        }
        Ok(())
    }
}

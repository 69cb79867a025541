//! Hardware audio adapter: capture with cpal, playback with rodio
//!
//! `cpal::Stream` and `rodio::OutputStream` are not `Send`, so every capture
//! and every playback lives on its own thread. The async side talks to those
//! threads through atomics (capture) or a command channel (playback), and the
//! threads report back through the registered status callback.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::mpsc::{self as std_mpsc, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use super::store::{samples_to_millis, AudioClip, RecordingStore};
use super::{lock, AudioSettings};
use crate::application::ports::{
    AudioError, AudioMode, AudioPlayer, AudioRecorder, CaptureStatus, FinalizedCapture,
    Permission, PlaybackStatus, StatusCallback,
};
use crate::domain::recording::{CaptureHandle, Duration, PlayableHandle};

/// Capture rate requested from the device when it supports it
const PREFERRED_SAMPLE_RATE: u32 = 44_100;

/// State shared between the async side and one capture thread
#[derive(Default)]
struct CaptureShared {
    /// Recorded audio samples (mono, i16, at device sample rate)
    samples: Mutex<Vec<i16>>,
    /// Samples are only kept while set; cleared by pause
    recording: AtomicBool,
    /// Asks the thread to drop the stream and exit
    stopped: AtomicBool,
    sample_rate: AtomicU32,
}

impl CaptureShared {
    fn elapsed(&self) -> Duration {
        let len = lock(&self.samples).len();
        Duration::from_millis(samples_to_millis(len, self.sample_rate.load(Ordering::SeqCst)))
    }
}

struct ActiveCapture {
    shared: Arc<CaptureShared>,
    thread: JoinHandle<()>,
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
    playbacks: Mutex<HashMap<PlayableHandle, std_mpsc::Sender<PlayerCommand>>>,
}

/// Microphone capture and speaker playback on the default devices.
///
/// Cloning is cheap; clones share captures and decoded clips, so one clone
/// can serve as recorder and another as player.
#[derive(Clone)]
pub struct CpalAudio {
    inner: Arc<Inner>,
}

impl CpalAudio {
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

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, AudioError> {
        let host = cpal::default_host();
        host.default_input_device().ok_or(AudioError::NoAudioDevice)
    }

    /// Get a suitable input configuration
    fn get_input_config(device: &cpal::Device) -> Result<(StreamConfig, SampleFormat), AudioError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| AudioError::CaptureFailed(format!("Failed to get configs: {}", e)))?;

        // Prefer mono, but accept stereo (mixed down in the callback)
        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_preferred = config.min_sample_rate().0 <= PREFERRED_SAMPLE_RATE
                && config.max_sample_rate().0 >= PREFERRED_SAMPLE_RATE;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_preferred && current.min_sample_rate().0 > PREFERRED_SAMPLE_RATE;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config
            .ok_or_else(|| AudioError::CaptureFailed("No suitable config found".into()))?;

        let sample_rate = if config_range.min_sample_rate().0 <= PREFERRED_SAMPLE_RATE
            && config_range.max_sample_rate().0 >= PREFERRED_SAMPLE_RATE
        {
            SampleRate(PREFERRED_SAMPLE_RATE)
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Mix interleaved frames down to mono
    fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    fn open_input_stream(shared: &Arc<CaptureShared>) -> Result<cpal::Stream, AudioError> {
        let device = Self::get_input_device()?;
        let (config, sample_format) = Self::get_input_config(&device)?;
        let channels = config.channels;
        shared.sample_rate.store(config.sample_rate.0, Ordering::SeqCst);

        let on_error = |err: cpal::StreamError| error!(error = %err, "Audio input stream error");

        let stream = match sample_format {
            SampleFormat::I16 => {
                let shared = Arc::clone(shared);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if shared.recording.load(Ordering::SeqCst) {
                            let mono = Self::stereo_to_mono(data, channels);
                            lock(&shared.samples).extend_from_slice(&mono);
                        }
                    },
                    on_error,
                    None,
                )
            }
            SampleFormat::F32 => {
                let shared = Arc::clone(shared);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if shared.recording.load(Ordering::SeqCst) {
                            let i16_data: Vec<i16> =
                                data.iter().map(|&s| (s * 32767.0) as i16).collect();
                            let mono = Self::stereo_to_mono(&i16_data, channels);
                            lock(&shared.samples).extend_from_slice(&mono);
                        }
                    },
                    on_error,
                    None,
                )
            }
            _ => return Err(AudioError::CaptureFailed("Unsupported sample format".into())),
        };

        stream.map_err(|e| AudioError::CaptureFailed(e.to_string()))
    }

    /// Body of a capture thread: owns the stream until asked to stop.
    fn run_capture(
        shared: Arc<CaptureShared>,
        handle: CaptureHandle,
        on_status: StatusCallback<CaptureStatus>,
        interval: std::time::Duration,
        ready: oneshot::Sender<Result<(), AudioError>>,
    ) {
        let stream = match Self::open_input_stream(&shared) {
            Ok(stream) => stream,
            Err(err) => {
                let _ = ready.send(Err(err));
                return;
            }
        };
        if let Err(e) = stream.play() {
            let _ = ready.send(Err(AudioError::CaptureFailed(e.to_string())));
            return;
        }
        shared.recording.store(true, Ordering::SeqCst);
        let _ = ready.send(Ok(()));

        while !shared.stopped.load(Ordering::SeqCst) {
            std::thread::park_timeout(interval);
            if shared.recording.load(Ordering::SeqCst) && !shared.stopped.load(Ordering::SeqCst) {
                on_status(CaptureStatus {
                    handle,
                    elapsed: shared.elapsed(),
                    is_recording: true,
                });
            }
        }

        drop(stream);
        debug!(%handle, "Capture thread exited");
    }

    /// Remove a capture, stop its thread and hand back the samples.
    async fn end_capture(&self, handle: CaptureHandle) -> Result<AudioClip, AudioError> {
        let capture = lock(&self.inner.captures)
            .remove(&handle)
            .ok_or_else(|| AudioError::UnknownHandle(handle.to_string()))?;

        capture.shared.recording.store(false, Ordering::SeqCst);
        capture.shared.stopped.store(true, Ordering::SeqCst);
        capture.thread.thread().unpark();

        let thread = capture.thread;
        tokio::task::spawn_blocking(move || thread.join())
            .await
            .map_err(|e| AudioError::CaptureFailed(format!("Task join error: {}", e)))?
            .map_err(|_| AudioError::CaptureFailed("Capture thread panicked".into()))?;

        let samples = std::mem::take(&mut *lock(&capture.shared.samples));
        let sample_rate = capture.shared.sample_rate.load(Ordering::SeqCst);
        Ok(AudioClip::new(samples, sample_rate))
    }

    fn start_sink(
        output: &OutputStreamHandle,
        clip: &AudioClip,
        position: Duration,
    ) -> Result<Sink, AudioError> {
        let sink = Sink::try_new(output).map_err(|e| AudioError::PlaybackFailed(e.to_string()))?;
        sink.append(SamplesBuffer::new(1, clip.sample_rate(), clip.tail_from(position)));
        Ok(sink)
    }

    /// Body of a playback thread: plays `clip` until it ends or is stopped.
    fn run_playback(
        clip: AudioClip,
        handle: PlayableHandle,
        on_status: StatusCallback<PlaybackStatus>,
        interval: std::time::Duration,
        commands: std_mpsc::Receiver<PlayerCommand>,
        ready: oneshot::Sender<Result<(), AudioError>>,
    ) {
        let (_stream, output) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                let _ = ready.send(Err(AudioError::PlaybackFailed(e.to_string())));
                return;
            }
        };
        let mut sink = match Self::start_sink(&output, &clip, Duration::ZERO) {
            Ok(sink) => sink,
            Err(err) => {
                let _ = ready.send(Err(err));
                return;
            }
        };
        let _ = ready.send(Ok(()));

        let total = clip.duration();
        let mut offset = Duration::ZERO;
        let mut started = Instant::now();

        loop {
            match commands.recv_timeout(interval) {
                Ok(PlayerCommand::Seek(position)) => {
                    sink.stop();
                    sink = match Self::start_sink(&output, &clip, position) {
                        Ok(sink) => sink,
                        Err(err) => {
                            error!(%handle, error = %err, "Failed to restart playback after seek");
                            return;
                        }
                    };
                    offset = position;
                    started = Instant::now();
                }
                Ok(PlayerCommand::Stop) | Err(RecvTimeoutError::Disconnected) => {
                    sink.stop();
                    debug!(%handle, "Playback thread stopped");
                    return;
                }
                Err(RecvTimeoutError::Timeout) => {}
            }

            if sink.empty() {
                on_status(PlaybackStatus {
                    handle,
                    position: total,
                    is_playing: false,
                    did_finish: true,
                });
                debug!(%handle, "Playback thread finished");
                return;
            }

            let position = Duration::from_millis(
                offset.as_millis() + started.elapsed().as_millis() as u64,
            );
            on_status(PlaybackStatus {
                handle,
                position: position.clamp_to(total),
                is_playing: true,
                did_finish: false,
            });
        }
    }
}

#[async_trait]
impl AudioRecorder for CpalAudio {
    async fn request_recording_permission(&self) -> Result<Permission, AudioError> {
        // Desktop hosts have no permission prompt; a missing input device is
        // the closest equivalent of a refusal.
        let has_input = tokio::task::spawn_blocking(|| Self::get_input_device().is_ok())
            .await
            .map_err(|e| AudioError::CaptureFailed(format!("Task join error: {}", e)))?;

        Ok(if has_input {
            Permission::Granted
        } else {
            Permission::Denied
        })
    }

    async fn configure_audio_mode(&self, mode: AudioMode) -> Result<(), AudioError> {
        let mut current = lock(&self.inner.mode);
        if *current != mode {
            debug!(?mode, "Audio mode configured");
            *current = mode;
        }
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
        let shared = Arc::new(CaptureShared::default());
        let interval = self.inner.settings.status_interval.as_std();
        let (ready_tx, ready_rx) = oneshot::channel();

        let thread_shared = Arc::clone(&shared);
        let thread = std::thread::Builder::new()
            .name(format!("{}", handle))
            .spawn(move || Self::run_capture(thread_shared, handle, on_status, interval, ready_tx))
            .map_err(|e| AudioError::CaptureFailed(e.to_string()))?;

        ready_rx
            .await
            .map_err(|_| AudioError::CaptureFailed("Capture thread exited early".into()))??;

        info!(
            %handle,
            sample_rate = shared.sample_rate.load(Ordering::SeqCst),
            "Capture started"
        );
        lock(&self.inner.captures).insert(handle, ActiveCapture { shared, thread });
        Ok(handle)
    }

    async fn pause_capture(&self, handle: CaptureHandle) -> Result<(), AudioError> {
        let captures = lock(&self.inner.captures);
        let capture = captures
            .get(&handle)
            .ok_or_else(|| AudioError::UnknownHandle(handle.to_string()))?;
        capture.shared.recording.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn finalize_capture(&self, handle: CaptureHandle) -> Result<FinalizedCapture, AudioError> {
        let clip = self.end_capture(handle).await?;
        let file_uri = self.inner.store.save(&clip).await?;
        let duration = clip.duration();

        let audio = PlayableHandle::new(self.next_id());
        lock(&self.inner.clips).insert(audio, clip);

        info!(%handle, %audio, %duration, %file_uri, "Capture finalized");
        Ok(FinalizedCapture {
            audio,
            duration,
            file_uri,
        })
    }

    async fn discard_capture(&self, handle: CaptureHandle) -> Result<(), AudioError> {
        match self.end_capture(handle).await {
            Ok(clip) => {
                debug!(%handle, samples = clip.samples().len(), "Capture discarded");
                Ok(())
            }
            // A capture whose finalize failed half-way is already gone
            Err(AudioError::UnknownHandle(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl AudioPlayer for CpalAudio {
    async fn play(
        &self,
        handle: PlayableHandle,
        on_status: StatusCallback<PlaybackStatus>,
    ) -> Result<(), AudioError> {
        let clip = lock(&self.inner.clips)
            .get(&handle)
            .cloned()
            .ok_or_else(|| AudioError::UnknownHandle(handle.to_string()))?;

        // A previous run of this handle may still be winding down
        if let Some(previous) = lock(&self.inner.playbacks).remove(&handle) {
            let _ = previous.send(PlayerCommand::Stop);
        }

        let interval = self.inner.settings.status_interval.as_std();
        let (command_tx, command_rx) = std_mpsc::channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        std::thread::Builder::new()
            .name(format!("{}", handle))
            .spawn(move || {
                Self::run_playback(clip, handle, on_status, interval, command_rx, ready_tx)
            })
            .map_err(|e| AudioError::PlaybackFailed(e.to_string()))?;

        ready_rx
            .await
            .map_err(|_| AudioError::PlaybackFailed("Playback thread exited early".into()))??;

        lock(&self.inner.playbacks).insert(handle, command_tx);
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
            // The thread is gone once the clip has finished
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
        debug!(%handle, "Audio released");
        Ok(())
    }
}

//! Rodio-based audio cue adapter
//!
//! Each cue is a short sequence of synthesized sine tones.

use std::time::Duration;

use async_trait::async_trait;
use rodio::source::{SineWave, Source, Zero};
use rodio::{OutputStream, Sink};

use crate::application::ports::{AudioCue, AudioCueError, AudioCueType};

const AMPLITUDE: f32 = 0.3;
const GAP_SAMPLE_RATE: u32 = 44_100;

/// One step of a cue: a tone, or silence when `freq` is zero
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tone {
    freq: f32,
    millis: u64,
    gain: f32,
}

const fn tone(freq: f32, millis: u64, gain: f32) -> Tone {
    Tone { freq, millis, gain }
}

const fn gap(millis: u64) -> Tone {
    Tone {
        freq: 0.0,
        millis,
        gain: 0.0,
    }
}

/// C5 -> E5
const START: &[Tone] = &[tone(523.0, 80, 1.0), tone(659.0, 120, 1.0)];
/// E5 -> C5
const STOP: &[Tone] = &[tone(659.0, 80, 1.0), tone(523.0, 120, 1.0)];
/// G4 twice
const DISCARD: &[Tone] = &[tone(392.0, 60, 0.8), gap(40), tone(392.0, 60, 0.8)];

fn tones(cue_type: AudioCueType) -> &'static [Tone] {
    match cue_type {
        AudioCueType::RecordingStart => START,
        AudioCueType::RecordingStop => STOP,
        AudioCueType::RecordingDiscard => DISCARD,
    }
}

/// Audio cue implementation using rodio
#[derive(Debug, Default)]
pub struct RodioAudioCue;

impl RodioAudioCue {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioCue for RodioAudioCue {
    async fn play(&self, cue_type: AudioCueType) -> Result<(), AudioCueError> {
        tokio::task::spawn_blocking(move || play_tones(tones(cue_type)))
            .await
            .map_err(|e| AudioCueError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}

/// Append `step` to `sink`, fading tones in over at most 30ms
fn append_step(sink: &Sink, step: Tone) {
    let length = Duration::from_millis(step.millis);
    if step.freq == 0.0 {
        sink.append(Zero::<f32>::new(1, GAP_SAMPLE_RATE).take_duration(length));
        return;
    }
    let fade = Duration::from_millis((step.millis / 5).min(30));
    sink.append(
        SineWave::new(step.freq)
            .take_duration(length)
            .fade_in(fade)
            .amplify(AMPLITUDE * step.gain),
    );
}

/// Play a tone sequence to the end (blocking)
fn play_tones(steps: &[Tone]) -> Result<(), AudioCueError> {
    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| AudioCueError::DeviceNotAvailable(e.to_string()))?;
    let sink =
        Sink::try_new(&stream_handle).map_err(|e| AudioCueError::PlaybackFailed(e.to_string()))?;

    for &step in steps {
        append_step(&sink, step);
    }
    sink.sleep_until_end();
    Ok(())
}

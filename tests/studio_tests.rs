//! Studio scenarios on the simulated backend
//!
//! These run real timers, so durations are kept short.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep, timeout};

use voice_recorder::application::{AudioEvent, Studio, StudioConfig, StudioUpdate};
use voice_recorder::domain::recording::Duration;
use voice_recorder::domain::session::{PlaybackState, RecorderState};
use voice_recorder::infrastructure::{AudioSettings, NoOpAudioCue, SimulatedAudio};

type SimulatedStudio = Studio<SimulatedAudio, SimulatedAudio>;

fn studio(config: StudioConfig) -> (SimulatedStudio, UnboundedReceiver<AudioEvent>, TempDir) {
    let dir = TempDir::new().unwrap();
    let audio = SimulatedAudio::new(AudioSettings {
        recordings_dir: dir.path().to_path_buf(),
        status_interval: Duration::from_millis(20),
    });
    let (studio, events) = Studio::new(audio.clone(), audio, Arc::new(NoOpAudioCue::new()), config);
    (studio, events, dir)
}

/// Feed events into the studio until `done` matches or the wait times out
async fn pump_until(
    studio: &mut SimulatedStudio,
    events: &mut UnboundedReceiver<AudioEvent>,
    done: impl Fn(&StudioUpdate) -> bool,
) -> bool {
    let wait = async {
        while let Some(event) = events.recv().await {
            if done(&studio.handle_event(event).await) {
                return true;
            }
        }
        false
    };
    timeout(StdDuration::from_secs(5), wait).await.unwrap_or(false)
}

async fn record(studio: &mut SimulatedStudio, events: &mut UnboundedReceiver<AudioEvent>, millis: u64) {
    studio.start_recording().await.unwrap();
    sleep(StdDuration::from_millis(millis)).await;
    while let Ok(event) = events.try_recv() {
        studio.handle_event(event).await;
    }
    studio.stop_recording().await.unwrap();
}

#[tokio::test]
async fn recording_is_saved_to_disk_with_its_length() {
    let (mut studio, mut events, dir) = studio(StudioConfig::default());

    record(&mut studio, &mut events, 300).await;

    let item = studio.recordings().get(0).unwrap();
    assert_eq!(item.name(), "Recording #1");
    assert!(item.duration() >= Duration::from_millis(250));
    assert!(item.duration() < Duration::from_millis(1_000));

    let path = item.file_uri().strip_prefix("file://").unwrap();
    assert!(std::path::Path::new(path).starts_with(dir.path()));
    assert_eq!(&std::fs::read(path).unwrap()[0..4], b"fLaC");
}

#[tokio::test]
async fn saved_duration_matches_the_recording_timer() {
    let (mut studio, mut events, _dir) = studio(StudioConfig::default());
    studio.start_recording().await.unwrap();

    let reached = pump_until(&mut studio, &mut events, |update| {
        matches!(update, StudioUpdate::Elapsed(d) if *d >= Duration::from_millis(1_100))
    })
    .await;
    assert!(reached);
    let elapsed = studio.elapsed();

    let item = studio.stop_recording().await.unwrap();
    assert!(item.duration() >= elapsed);
    assert!(item.duration() < Duration::from_millis(1_500));
    assert_eq!(item.duration().format_clock(), elapsed.format_clock());
}

#[tokio::test]
async fn elapsed_time_advances_while_recording() {
    let (mut studio, mut events, _dir) = studio(StudioConfig::default());
    studio.start_recording().await.unwrap();

    let advanced = pump_until(&mut studio, &mut events, |update| {
        matches!(update, StudioUpdate::Elapsed(d) if *d >= Duration::from_millis(100))
    })
    .await;

    assert!(advanced);
    assert!(studio.elapsed() >= Duration::from_millis(100));
    studio.shutdown().await;
    assert_eq!(studio.recorder_state(), RecorderState::Idle);
}

#[tokio::test]
async fn max_duration_is_reported() {
    let config = StudioConfig {
        max_duration: Duration::from_millis(100),
        ..StudioConfig::default()
    };
    let (mut studio, mut events, _dir) = studio(config);
    studio.start_recording().await.unwrap();

    let reached = {
        let wait = async {
            while let Some(event) = events.recv().await {
                studio.handle_event(event).await;
                if studio.max_duration_reached() {
                    return true;
                }
            }
            false
        };
        timeout(StdDuration::from_secs(5), wait).await.unwrap_or(false)
    };

    assert!(reached);
    studio.stop_recording().await.unwrap();
    assert_eq!(studio.recordings().len(), 1);
}

#[tokio::test]
async fn playback_runs_to_the_end() {
    let (mut studio, mut events, _dir) = studio(StudioConfig::default());
    record(&mut studio, &mut events, 150).await;

    studio.play(0).await.unwrap();
    assert!(matches!(studio.playback_state(), PlaybackState::Playing(_)));

    let finished = pump_until(&mut studio, &mut events, |update| {
        matches!(update, StudioUpdate::PlaybackFinished(name) if name == "Recording #1")
    })
    .await;

    assert!(finished);
    assert_eq!(studio.playback_state(), &PlaybackState::Stopped);
    assert_eq!(studio.position(), Duration::ZERO);
}

#[tokio::test]
async fn seek_moves_the_position() {
    let (mut studio, mut events, _dir) = studio(StudioConfig::default());
    record(&mut studio, &mut events, 400).await;

    studio.play(0).await.unwrap();
    studio.seek(Duration::from_millis(300)).await.unwrap();

    let moved = pump_until(&mut studio, &mut events, |update| {
        matches!(update, StudioUpdate::Position(p) if *p >= Duration::from_millis(300))
    })
    .await;
    assert!(moved);
    studio.stop_playback().await.unwrap();
}

#[tokio::test]
async fn deleting_the_playing_item_stops_playback() {
    let (mut studio, mut events, _dir) = studio(StudioConfig::default());
    record(&mut studio, &mut events, 100).await;
    record(&mut studio, &mut events, 100).await;

    studio.play(1).await.unwrap();
    let removed = studio.delete(1).await.unwrap();

    assert_eq!(removed.name(), "Recording #2");
    assert_eq!(studio.playback_state(), &PlaybackState::Stopped);
    assert_eq!(studio.recordings().len(), 1);
}

#[tokio::test]
async fn numbering_continues_after_delete() {
    let (mut studio, mut events, _dir) = studio(StudioConfig::default());
    record(&mut studio, &mut events, 50).await;
    record(&mut studio, &mut events, 50).await;
    studio.delete(0).await.unwrap();
    record(&mut studio, &mut events, 50).await;

    let names: Vec<_> = studio.recordings().iter().map(|item| item.name().to_string()).collect();
    assert_eq!(names, ["Recording #2", "Recording #2"]);
}

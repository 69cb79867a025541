//! Interactive session runner
//!
//! One task owns the [`Studio`] and handles, one at a time, stdin commands,
//! forwarded audio status events and shutdown signals.

use std::io::BufRead;
use std::process::ExitCode;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::ports::{AudioPlayer, AudioRecorder, ConfigStore};
use crate::application::{AudioEvent, Studio, StudioConfig, StudioError, StudioUpdate};
use crate::domain::config::AppConfig;
use crate::domain::recording::Duration;
use crate::domain::session::{PlaybackState, RecorderState};
use crate::infrastructure::{create_audio, create_audio_cue, AudioSettings, XdgConfigStore};

use super::args::VALID_BACKENDS;
use super::commands::{Command, HELP};
use super::presenter::{format_playback_timer, format_recording_timer, Presenter};
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Resolved options for an interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub backend: String,
    pub audio: AudioSettings,
    pub studio: StudioConfig,
    pub audio_cues: bool,
}

impl SessionOptions {
    /// Validate a merged config.
    ///
    /// Unlike the `*_or_default` accessors, invalid values are reported
    /// instead of replaced.
    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        let backend = config.backend_or_default().to_lowercase();
        if !VALID_BACKENDS.contains(&backend.as_str()) {
            return Err(format!(
                "Invalid backend '{}'. Valid options: {}",
                backend,
                VALID_BACKENDS.join(", ")
            ));
        }

        let max_duration = parse_setting(config.max_duration.as_deref(), "max-duration")?
            .unwrap_or_else(Duration::default_max_duration);
        let status_interval = parse_setting(config.status_interval.as_deref(), "status-interval")?
            .unwrap_or_else(Duration::default_status_interval);

        Ok(Self {
            backend,
            audio: AudioSettings {
                recordings_dir: config.recordings_dir_or_default(),
                status_interval,
            },
            studio: StudioConfig {
                stop_playback_on_delete: config.stop_playback_on_delete_or_default(),
                max_duration,
            },
            audio_cues: config.audio_cues_or_default(),
        })
    }
}

fn parse_setting(value: Option<&str>, name: &str) -> Result<Option<Duration>, String> {
    value
        .map(|s| s.parse::<Duration>().map_err(|e| format!("Invalid {}: {}", name, e)))
        .transpose()
}

/// Load and merge configuration: defaults < file < cli
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, path = %store.path().display(), "Ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Read stdin lines on a plain thread; blocking reads must not hold up
/// runtime shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "Stopped reading stdin");
                    break;
                }
            }
        }
    });
    rx
}

/// Run the interactive session until `quit`, end of input or a signal
pub async fn run_session(options: SessionOptions) -> ExitCode {
    let presenter = Presenter::new();

    let audio = match create_audio(&options.backend, options.audio.clone()) {
        Ok(audio) => audio,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    let mut signals = match ShutdownSignal::new() {
        Ok(signals) => signals,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let cue = create_audio_cue(options.audio_cues);
    let (studio, mut events) = Studio::new(audio.clone(), audio, cue, options.studio);
    let mut lines = spawn_stdin_reader();

    info!(
        backend = %options.backend,
        recordings_dir = %options.audio.recordings_dir.display(),
        "Session started"
    );
    presenter.info(&format!(
        "Voice recorder ready ({} backend). Type 'help' for commands.",
        options.backend
    ));

    let mut session = Session { studio, presenter };
    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    debug!("End of input");
                    break;
                };
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => session.execute(command).await,
                    Err(e) => session.presenter.error(&e.to_string()),
                }
            }
            Some(event) = events.recv() => session.handle_event(event).await,
            Some(_) = signals.recv() => break,
        }
        session.refresh();
    }

    session.shutdown().await;
    ExitCode::from(EXIT_SUCCESS)
}

/// The studio plus its terminal front end
struct Session<R: AudioRecorder, P: AudioPlayer> {
    studio: Studio<R, P>,
    presenter: Presenter,
}

impl<R: AudioRecorder, P: AudioPlayer> Session<R, P> {
    /// Run a command; failures are reported and the session carries on
    async fn execute(&mut self, command: Command) {
        if let Err(e) = self.run(command).await {
            self.presenter.error(&e.to_string());
        }
    }

    async fn run(&mut self, command: Command) -> Result<(), StudioError> {
        match command {
            Command::Empty | Command::Quit => {}
            Command::Record => {
                self.studio.start_recording().await?;
                self.presenter.success("Recording started");
            }
            Command::Pause => {
                self.studio.pause_recording().await?;
                self.presenter.info(&format!(
                    "Recording paused at {}",
                    self.studio.elapsed().format_clock()
                ));
            }
            Command::Stop => {
                let item = self.studio.stop_recording().await?;
                self.presenter.success(&format!("Saved {}", item));
            }
            Command::Discard => {
                self.studio.discard_recording().await?;
                self.presenter.success("Recording discarded");
            }
            Command::List => {
                let playing = self.playing_index();
                self.presenter
                    .recordings(self.studio.recordings().iter().enumerate(), playing);
            }
            Command::Play(index) => {
                self.studio.play(index).await?;
                if let PlaybackState::Playing(item) = self.studio.playback_state() {
                    self.presenter.info(&format!("Playing {}", item.name()));
                }
            }
            Command::Seek { index, position } => self.seek(index, position).await?,
            Command::Halt => {
                self.studio.stop_playback().await?;
                self.presenter.info("Playback stopped");
            }
            Command::Rename { index, name } => {
                self.studio.rename(index, name.as_str())?;
                self.presenter
                    .success(&format!("Renamed recording {} to \"{}\"", index + 1, name));
            }
            Command::Delete(index) => {
                let removed = self.studio.delete(index).await?;
                self.presenter.success(&format!("Deleted {}", removed.name()));
            }
            Command::Clear => {
                let count = self.studio.clear().await?;
                self.presenter
                    .success(&format!("Cleared {} recording(s)", count));
            }
            Command::Search(query) => {
                let playing = self.playing_index();
                self.presenter
                    .recordings(self.studio.search(&query), playing);
            }
            Command::Status => self.status(),
            Command::Help => self.presenter.output(HELP),
        }
        Ok(())
    }

    /// Seek the playing item; with `index`, start that item first unless it
    /// is already playing. The target is clamped to the item's length.
    async fn seek(&mut self, index: Option<usize>, position: Duration) -> Result<(), StudioError> {
        if let Some(index) = index {
            if self.playing_index() != Some(index) {
                self.studio.play(index).await?;
            }
        }

        let length = match self.studio.playback_state() {
            PlaybackState::Playing(item) => item.duration(),
            PlaybackState::Stopped => Duration::ZERO,
        };
        let target = position.clamp_to(length);
        self.studio.seek(target).await?;
        self.presenter
            .info(&format!("Jumped to {}", target.format_clock()));
        Ok(())
    }

    async fn handle_event(&mut self, event: AudioEvent) {
        match self.studio.handle_event(event).await {
            StudioUpdate::Elapsed(_) if self.studio.max_duration_reached() => {
                self.presenter.warn("Max duration reached, auto-stopping");
                self.execute(Command::Stop).await;
            }
            StudioUpdate::PlaybackFinished(name) => {
                self.presenter.success(&format!("Finished playing {}", name));
            }
            StudioUpdate::Elapsed(_) | StudioUpdate::Position(_) | StudioUpdate::Ignored => {}
        }
    }

    fn playing_index(&self) -> Option<usize> {
        let audio = self.studio.playback_state().active()?;
        self.studio.recordings().position_of(audio)
    }

    fn status(&self) {
        let recorder = match self.studio.recorder_state() {
            RecorderState::Idle => "idle".to_string(),
            state => format!("{} ({})", state.as_str(), self.studio.elapsed().format_clock()),
        };
        let playback = match self.studio.playback_state() {
            PlaybackState::Stopped => "stopped".to_string(),
            PlaybackState::Playing(item) => format!(
                "playing {} ({} / {})",
                item.name(),
                self.studio.position().format_clock(),
                item.duration().format_clock()
            ),
        };

        self.presenter.key_value("recorder", &recorder);
        self.presenter.key_value("playback", &playback);
        self.presenter
            .key_value("recordings", &self.studio.recordings().len().to_string());
    }

    /// Redraw the live timer line
    fn refresh(&mut self) {
        let max = self.studio.config().max_duration;
        let recording = match self.studio.recorder_state() {
            RecorderState::Idle => None,
            RecorderState::Recording(_) => {
                Some(format_recording_timer(self.studio.elapsed(), max, false))
            }
            RecorderState::Paused(_) => {
                Some(format_recording_timer(self.studio.elapsed(), max, true))
            }
        };
        let playback = match self.studio.playback_state() {
            PlaybackState::Stopped => None,
            PlaybackState::Playing(item) => Some(format_playback_timer(
                item.name(),
                self.studio.position(),
                item.duration(),
            )),
        };

        let line = match (recording, playback) {
            (Some(recording), Some(playback)) => Some(format!("{}   {}", recording, playback)),
            (recording, playback) => recording.or(playback),
        };
        self.presenter.live_status(line);
    }

    async fn shutdown(&mut self) {
        self.presenter.stop_spinner();
        self.studio.shutdown().await;
        info!("Session ended");
    }
}

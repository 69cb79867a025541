//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

/// Voice recorder - record, list and play back voice memos
#[derive(Parser, Debug)]
#[command(name = "voice-recorder")]
#[command(version)]
#[command(about = "Record, list and play back voice memos from the terminal")]
#[command(long_about = None)]
pub struct Cli {
    /// Audio backend
    #[arg(short = 'b', long, value_name = "BACKEND")]
    pub backend: Option<BackendArg>,

    /// Stop a recording automatically after this long (e.g., 90s, 5m, 1m30s)
    #[arg(short = 'm', long, value_name = "TIME")]
    pub max_duration: Option<String>,

    /// Directory for recording files
    #[arg(long, env = "VOICE_RECORDER_DIR", value_name = "DIR")]
    pub recordings_dir: Option<String>,

    /// Disable start/stop/discard chimes
    #[arg(long)]
    pub no_cues: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Backend argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// Default microphone and speakers
    Cpal,
    /// No audio devices; silence on a wall clock
    Simulated,
}

impl BackendArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpal => "cpal",
            Self::Simulated => "simulated",
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "backend",
    "recordings_dir",
    "max_duration",
    "status_interval",
    "audio_cues",
    "stop_playback_on_delete",
];

/// Valid backend values
pub const VALID_BACKENDS: &[&str] = &["cpal", "simulated"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["voice-recorder"]);
        assert!(cli.backend.is_none());
        assert!(cli.max_duration.is_none());
        assert!(cli.recordings_dir.is_none());
        assert!(!cli.no_cues);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_backend() {
        let cli = Cli::parse_from(["voice-recorder", "--backend", "simulated"]);
        assert_eq!(cli.backend, Some(BackendArg::Simulated));
        assert_eq!(BackendArg::Simulated.as_str(), "simulated");
    }

    #[test]
    fn cli_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["voice-recorder", "-b", "alsa"]).is_err());
    }

    #[test]
    fn cli_parses_session_flags() {
        let cli = Cli::parse_from(["voice-recorder", "-m", "5m", "--no-cues", "-v"]);
        assert_eq!(cli.max_duration.as_deref(), Some("5m"));
        assert!(cli.no_cues);
        assert!(cli.verbose);
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["voice-recorder", "config", "set", "audio_cues", "false"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "audio_cues");
            assert_eq!(value, "false");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn cli_parses_config_path() {
        let cli = Cli::parse_from(["voice-recorder", "config", "path"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Path
            })
        ));
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("backend"));
        assert!(is_valid_config_key("stop_playback_on_delete"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}

//! CLI layer - Command-line interface
//!
//! Contains argument parsing, the interactive session, output formatting,
//! logging setup and signal handling.

pub mod app;
pub mod args;
pub mod commands;
pub mod config_cmd;
pub mod logging;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{
    load_merged_config, run_session, SessionOptions, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR,
};
pub use args::{BackendArg, Cli, Commands, ConfigAction};
pub use commands::{Command, CommandError};
pub use presenter::Presenter;

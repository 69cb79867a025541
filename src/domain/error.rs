//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, <number>ms or m:ss (e.g., 30s, 1m, 2m30s, 1:05)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when a positional index does not address an existing recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid index {index}: collection holds {len} recording(s)")]
pub struct InvalidIndex {
    pub index: usize,
    pub len: usize,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

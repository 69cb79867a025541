//! Voice recorder - record, list and play back voice memos from the terminal
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Recording items, the recordings collection, durations and
//!   the recorder/playback state machines
//! - **Application**: Port interfaces (traits), the session managers and the
//!   [`Studio`](application::Studio) that coordinates them
//! - **Infrastructure**: Adapters for cpal/rodio audio, a simulated backend,
//!   FLAC storage, audio cues and the config file
//! - **CLI**: Argument parsing, the interactive session and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

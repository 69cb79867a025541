//! Opaque audio handles issued by the platform audio adapter

use std::fmt;

/// In-progress capture owned by the audio subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureHandle(u64);

/// Finalized, replayable audio owned by the audio subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayableHandle(u64);

impl CaptureHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl PlayableHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CaptureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capture-{}", self.0)
    }
}

impl fmt::Display for PlayableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "playable-{}", self.0)
    }
}

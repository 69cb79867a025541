//! Recording value objects and the recordings collection

mod collection;
mod duration;
mod handle;
mod item;

pub use collection::RecordingCollection;
pub use duration::{Duration, DEFAULT_MAX_DURATION_SECS, DEFAULT_STATUS_INTERVAL_MS};
pub use handle::{CaptureHandle, PlayableHandle};
pub use item::RecordingItem;

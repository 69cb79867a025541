//! Decoded clips and their FLAC files on disk

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::application::ports::AudioError;
use crate::domain::recording::Duration;

use super::flac_encoder::encode_to_flac;

/// Finalized mono audio kept in memory for playback
#[derive(Debug, Clone)]
pub struct AudioClip {
    samples: Arc<Vec<i16>>,
    sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples: Arc::new(samples),
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(samples_to_millis(self.samples.len(), self.sample_rate))
    }

    /// Samples from `position` to the end; empty past the end
    pub fn tail_from(&self, position: Duration) -> Vec<i16> {
        let offset = millis_to_samples(position.as_millis(), self.sample_rate);
        self.samples.get(offset..).map(<[i16]>::to_vec).unwrap_or_default()
    }
}

pub(crate) fn samples_to_millis(samples: usize, sample_rate: u32) -> u64 {
    if sample_rate == 0 {
        return 0;
    }
    samples as u64 * 1000 / sample_rate as u64
}

fn millis_to_samples(millis: u64, sample_rate: u32) -> usize {
    (millis * sample_rate as u64 / 1000) as usize
}

/// Writes finalized clips as FLAC files into one directory
#[derive(Debug, Clone)]
pub struct RecordingStore {
    dir: PathBuf,
}

impl RecordingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Encode `clip` and write it under a fresh name.
    ///
    /// # Returns
    /// The `file://` URI of the written file
    pub async fn save(&self, clip: &AudioClip) -> Result<String, AudioError> {
        let samples = Arc::clone(&clip.samples);
        let sample_rate = clip.sample_rate;

        let encoded = tokio::task::spawn_blocking(move || encode_to_flac(&samples, sample_rate))
            .await
            .map_err(|e| AudioError::EncodingFailed(format!("Encode task error: {}", e)))?
            .map_err(|e| AudioError::EncodingFailed(e.to_string()))?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AudioError::EncodingFailed(format!("Failed to create {}: {}", self.dir.display(), e)))?;

        let path = self.dir.join(format!("{}.flac", Uuid::new_v4()));
        fs::write(&path, &encoded)
            .await
            .map_err(|e| AudioError::EncodingFailed(format!("Failed to write {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), bytes = encoded.len(), "Recording written");
        Ok(format!("file://{}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_duration_from_sample_count() {
        let clip = AudioClip::new(vec![0; 24_000], 16_000);
        assert_eq!(clip.duration(), Duration::from_millis(1_500));
    }

    #[test]
    fn tail_from_skips_samples() {
        let clip = AudioClip::new((0..16_000).map(|i| i as i16).collect(), 16_000);
        let tail = clip.tail_from(Duration::from_millis(500));
        assert_eq!(tail.len(), 8_000);
        assert_eq!(tail[0], 8_000);
    }

    #[test]
    fn tail_past_end_is_empty() {
        let clip = AudioClip::new(vec![0; 100], 16_000);
        assert!(clip.tail_from(Duration::from_secs(10)).is_empty());
    }

    #[tokio::test]
    async fn save_writes_flac_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordingStore::new(dir.path().join("nested"));
        let clip = AudioClip::new(vec![0; 1_600], 16_000);

        let uri = store.save(&clip).await.unwrap();
        let path = uri.strip_prefix("file://").unwrap();
        assert!(path.ends_with(".flac"));

        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[0..4], b"fLaC");
    }

    #[tokio::test]
    async fn each_save_gets_a_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordingStore::new(dir.path());
        let clip = AudioClip::new(vec![0; 160], 16_000);

        let first = store.save(&clip).await.unwrap();
        let second = store.save(&clip).await.unwrap();
        assert_ne!(first, second);
    }
}

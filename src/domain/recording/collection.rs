//! Ordered, in-memory list of finished recordings
//!
//! Indices are positional: deleting item `k` shifts every later item down by
//! one, so an index must not be reused across a mutation.

use crate::domain::error::InvalidIndex;

use super::{Duration, PlayableHandle, RecordingItem};

/// Insertion-ordered recordings list
#[derive(Debug, Clone, Default)]
pub struct RecordingCollection {
    items: Vec<RecordingItem>,
}

impl RecordingCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RecordingItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordingItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[RecordingItem] {
        &self.items
    }

    /// Append a freshly finalized recording named `Recording #N`, where N is
    /// the collection length after insertion. Returns the new item's index.
    pub fn append(
        &mut self,
        audio: PlayableHandle,
        duration: Duration,
        file_uri: impl Into<String>,
    ) -> usize {
        let name = RecordingItem::default_name(self.items.len() + 1);
        self.items
            .push(RecordingItem::new(name, audio, duration, file_uri));
        self.items.len() - 1
    }

    /// Replace the name of the item at `index`
    pub fn rename(&mut self, index: usize, new_name: impl Into<String>) -> Result<(), InvalidIndex> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(InvalidIndex { index, len })?;
        item.set_name(new_name.into());
        Ok(())
    }

    /// Remove and return the item at `index`
    pub fn delete(&mut self, index: usize) -> Result<RecordingItem, InvalidIndex> {
        if index >= self.items.len() {
            return Err(InvalidIndex {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Remove every item, returning them in order
    pub fn clear(&mut self) -> Vec<RecordingItem> {
        std::mem::take(&mut self.items)
    }

    /// Case-insensitive substring filter over names.
    ///
    /// Yields `(index, item)` pairs in collection order; the empty query
    /// matches everything.
    pub fn search<'a>(
        &'a self,
        query: &'a str,
    ) -> impl Iterator<Item = (usize, &'a RecordingItem)> + 'a {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .enumerate()
            .filter(move |(_, item)| item.name().to_lowercase().contains(&needle))
    }

    /// Position of the item backed by `audio`, if still present
    pub fn position_of(&self, audio: PlayableHandle) -> Option<usize> {
        self.items.iter().position(|item| item.audio() == audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection_of(n: u64) -> RecordingCollection {
        let mut collection = RecordingCollection::new();
        for i in 0..n {
            collection.append(
                PlayableHandle::new(i),
                Duration::from_secs(i + 1),
                format!("file:///tmp/{}.flac", i),
            );
        }
        collection
    }

    fn names(collection: &RecordingCollection) -> Vec<&str> {
        collection.iter().map(|item| item.name()).collect()
    }

    #[test]
    fn append_names_by_position() {
        let collection = collection_of(3);
        assert_eq!(
            names(&collection),
            vec!["Recording #1", "Recording #2", "Recording #3"]
        );
    }

    #[test]
    fn append_after_delete_uses_current_length() {
        let mut collection = collection_of(2);
        collection.delete(0).unwrap();
        let index = collection.append(PlayableHandle::new(9), Duration::from_secs(1), "f");
        assert_eq!(index, 1);
        // Names are never deduplicated
        assert_eq!(names(&collection), vec!["Recording #2", "Recording #2"]);
    }

    #[test]
    fn delete_shifts_later_items() {
        let mut collection = collection_of(4);
        let before: Vec<RecordingItem> = collection.iter().cloned().collect();

        let removed = collection.delete(1).unwrap();
        assert_eq!(removed, before[1]);
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.get(0), Some(&before[0]));
        assert_eq!(collection.get(1), Some(&before[2]));
        assert_eq!(collection.get(2), Some(&before[3]));
    }

    #[test]
    fn delete_first_of_two() {
        let mut collection = collection_of(2);
        collection.delete(0).unwrap();
        assert_eq!(names(&collection), vec!["Recording #2"]);
    }

    #[test]
    fn delete_out_of_range_fails_without_mutation() {
        let mut collection = collection_of(2);
        let err = collection.delete(2).unwrap_err();
        assert_eq!(err, InvalidIndex { index: 2, len: 2 });
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn rename_in_place() {
        let mut collection = collection_of(2);
        collection.rename(1, "Interview").unwrap();
        assert_eq!(names(&collection), vec!["Recording #1", "Interview"]);
    }

    #[test]
    fn rename_empty_is_accepted_and_idempotent() {
        let mut collection = collection_of(1);
        collection.rename(0, "").unwrap();
        collection.rename(0, "").unwrap();
        assert_eq!(collection.get(0).unwrap().name(), "");
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn rename_out_of_range_fails() {
        let mut collection = collection_of(1);
        assert!(collection.rename(1, "x").is_err());
        assert!(RecordingCollection::new().rename(0, "x").is_err());
    }

    #[test]
    fn clear_empties_everything() {
        let mut collection = collection_of(3);
        let removed = collection.clear();
        assert_eq!(removed.len(), 3);
        assert!(collection.is_empty());
    }

    #[test]
    fn search_empty_returns_all_in_order() {
        let collection = collection_of(3);
        let indices: Vec<usize> = collection.search("").map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut collection = collection_of(3);
        collection.rename(0, "Morning Walk").unwrap();
        collection.rename(2, "walkthrough notes").unwrap();

        let hits: Vec<(usize, &str)> = collection
            .search("WALK")
            .map(|(i, item)| (i, item.name()))
            .collect();
        assert_eq!(hits, vec![(0, "Morning Walk"), (2, "walkthrough notes")]);
    }

    #[test]
    fn search_matches_name_only() {
        let collection = collection_of(2);
        assert_eq!(collection.search("flac").count(), 0);
        assert_eq!(collection.search("#2").count(), 1);
    }

    #[test]
    fn search_reflects_mutations() {
        let mut collection = collection_of(2);
        assert_eq!(collection.search("recording").count(), 2);
        collection.delete(0).unwrap();
        assert_eq!(collection.search("recording").count(), 1);
    }

    #[test]
    fn position_of_follows_shifts() {
        let mut collection = collection_of(3);
        assert_eq!(collection.position_of(PlayableHandle::new(2)), Some(2));
        collection.delete(0).unwrap();
        assert_eq!(collection.position_of(PlayableHandle::new(2)), Some(1));
        assert_eq!(collection.position_of(PlayableHandle::new(0)), None);
    }
}

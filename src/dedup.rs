//! Duplicate detection over case-insensitive `(title, artist)` keys.

use crate::playlist::Playlist;
use crate::track::{normalize, NormalizedKey, TrackRef};
use std::collections::HashSet;

/// Running set of keys already seen by this guard.
///
/// [`DuplicateGuard::is_duplicate`] accumulates keys across calls;
/// [`DuplicateGuard::clean_playlist`] starts from an empty set every time and
/// leaves the set holding exactly the keys of the cleaned playlist.
#[derive(Debug, Default)]
pub struct DuplicateGuard {
    seen: HashSet<NormalizedKey>,
}

impl DuplicateGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the pair was seen before, otherwise records it and
    /// returns `false`.
    pub fn is_duplicate(&mut self, title: &str, artist: &str) -> bool {
        !self.seen.insert(normalize(title, artist))
    }

    /// Forgets every key.
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Removes every track whose key already appeared earlier in the
    /// playlist, keeping first occurrences in their original order.
    ///
    /// Walks node handles once, so each removal is O(1). Returns the removed
    /// tracks in traversal order.
    pub fn clean_playlist(&mut self, playlist: &mut Playlist) -> Vec<TrackRef> {
        self.reset();
        let mut removed = Vec::new();
        let mut cursor = playlist.first_handle();

        while let Some(handle) = cursor {
            // Grab the successor before the node can be unlinked.
            cursor = playlist.next_handle(handle);
            let Some(track) = playlist.track_at(handle) else {
                continue;
            };
            if !self.seen.insert(track.normalized_key()) {
                if let Some(track) = playlist.remove_handle(handle) {
                    log::trace!("Dropping duplicate `{}' by `{}'", track.title, track.artist);
                    removed.push(track);
                }
            }
        }

        log::info!("Removed {} duplicate tracks", removed.len());
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;

    fn titles(playlist: &Playlist) -> Vec<String> {
        playlist.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn test_is_duplicate_second_call() {
        let mut guard = DuplicateGuard::new();
        assert!(!guard.is_duplicate("Same", "Artist"));
        assert!(guard.is_duplicate("Same", "Artist"));
        assert!(guard.is_duplicate("SAME", "artist"));
        assert!(!guard.is_duplicate("Same", "Other"));
    }

    #[test]
    fn test_clean_keeps_first_occurrence() {
        let mut playlist = Playlist::new();
        playlist.append(Track::new("1", "A", "X", 100).shared());
        playlist.append(Track::new("2", "a", "x", 120).shared());
        playlist.append(Track::new("3", "B", "Y", 90).shared());

        let removed = DuplicateGuard::new().clean_playlist(&mut playlist);

        assert_eq!(titles(&playlist), ["A", "B"]);
        assert_eq!(playlist.get(0).unwrap().id, "1");
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, "2");
    }

    #[test]
    fn test_clean_preserves_relative_order() {
        let mut playlist = Playlist::new();
        let entries = [
            ("A", "1"),
            ("B", "2"),
            ("A", "1"),
            ("C", "3"),
            ("B", "2"),
            ("A", "1"),
        ];
        for (title, artist) in entries {
            playlist.append(Track::from_metadata(title, artist, 60).shared());
        }

        DuplicateGuard::new().clean_playlist(&mut playlist);
        assert_eq!(titles(&playlist), ["A", "B", "C"]);
        assert_eq!(playlist.len(), 3);
    }

    #[test]
    fn test_clean_resets_previous_keys() {
        let mut guard = DuplicateGuard::new();
        assert!(!guard.is_duplicate("A", "X"));

        let mut playlist = Playlist::new();
        playlist.append(Track::from_metadata("A", "X", 100).shared());
        guard.clean_playlist(&mut playlist);

        assert_eq!(playlist.len(), 1, "keys from earlier checks must not leak into a clean");
        assert_eq!(guard.seen_count(), 1);
    }

    #[test]
    fn test_clean_empty_playlist() {
        let mut playlist = Playlist::new();
        assert!(DuplicateGuard::new().clean_playlist(&mut playlist).is_empty());
    }
}

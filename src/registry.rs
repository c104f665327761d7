//! Exact-match track lookup by identifier and by case-insensitive title.

use crate::track::TrackRef;
use std::collections::HashMap;

/// Two hash maps over the same tracks: one keyed by id, one by lowercased title.
#[derive(Debug, Default)]
pub struct TrackRegistry {
    by_id: HashMap<String, TrackRef>,
    by_title: HashMap<String, TrackRef>,
}

impl TrackRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a track under both keys. A later track with the same id or
    /// title replaces the earlier mapping.
    pub fn put(&mut self, track: TrackRef) {
        log::trace!("Registering track `{}' ({})", track.title, track.id);
        self.by_title.insert(track.title.to_lowercase(), TrackRef::clone(&track));
        self.by_id.insert(track.id.clone(), track);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<TrackRef> {
        self.by_id.get(id).cloned()
    }

    #[must_use]
    pub fn get_by_title(&self, title: &str) -> Option<TrackRef> {
        self.by_title.get(&title.to_lowercase()).cloned()
    }

    /// Drops both mappings for the track. The title mapping is only removed
    /// when it still points at this track's id.
    pub fn remove(&mut self, track: &TrackRef) {
        self.by_id.remove(&track.id);
        let title = track.title.to_lowercase();
        if self
            .by_title
            .get(&title)
            .is_some_and(|current| current.id == track.id)
        {
            self.by_title.remove(&title);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;

    #[test]
    fn test_lookup_by_id_and_title() {
        let mut registry = TrackRegistry::new();
        let track = Track::new("1", "Title", "Artist", 100).shared();
        registry.put(TrackRef::clone(&track));

        assert_eq!(registry.get_by_title("title"), Some(TrackRef::clone(&track)));
        assert_eq!(registry.get_by_title("TITLE"), Some(TrackRef::clone(&track)));
        assert_eq!(registry.get("1"), Some(track));
        assert!(registry.get("2").is_none());
    }

    #[test]
    fn test_remove_clears_both_maps() {
        let mut registry = TrackRegistry::new();
        let track = Track::new("1", "Title", "Artist", 100).shared();
        registry.put(TrackRef::clone(&track));
        registry.remove(&track);

        assert!(registry.is_empty());
        assert!(registry.get_by_title("title").is_none());
    }

    #[test]
    fn test_remove_keeps_newer_title_mapping() {
        let mut registry = TrackRegistry::new();
        let old = Track::new("1", "Title", "Artist", 100).shared();
        let new = Track::new("2", "Title", "Other", 120).shared();
        registry.put(TrackRef::clone(&old));
        registry.put(TrackRef::clone(&new));
        registry.remove(&old);

        assert_eq!(registry.get_by_title("title"), Some(new));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_large_registry_lookup() {
        let mut registry = TrackRegistry::new();
        for i in 0..1000 {
            registry.put(
                Track::new(i.to_string(), format!("Song{i}"), format!("Artist{}", i % 10), i)
                    .shared(),
            );
        }
        let found = registry.get_by_title("song500").expect("song500 registered");
        assert_eq!(found.id, "500");
    }
}

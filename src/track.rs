//! Track metadata records.
//!
//! A [`Track`] never changes after construction. Containers hold it through a
//! shared [`TrackRef`], so the same record may sit in the playlist, the rating
//! index and the popularity ranker at once; removing it from one container
//! leaves the others untouched.

use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// Shared, non-owning handle to a track held by the containers.
pub type TrackRef = Rc<Track>;

/// Case-insensitive `(title, artist)` pair used for duplicate and title matching.
pub type NormalizedKey = (String, String);

/// How a track is described in memory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Track {
    /// Unique identifier, either derived from title and artist or handed out
    /// by the session.
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Length in seconds.
    pub duration: u32,
}

impl Track {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            duration,
        }
    }

    /// Builds a track whose id is derived from the lowercased title and artist,
    /// e.g. `"fix you_coldplay"`.
    #[must_use]
    pub fn from_metadata(title: &str, artist: &str, duration: u32) -> Self {
        let id = format!("{}_{}", title.to_lowercase(), artist.to_lowercase());
        Self::new(id, title, artist, duration)
    }

    /// Wraps the track into a shared reference.
    #[must_use]
    pub fn shared(self) -> TrackRef {
        Rc::new(self)
    }

    #[must_use]
    pub fn normalized_key(&self) -> NormalizedKey {
        normalize(&self.title, &self.artist)
    }
}

/// Lowercases a title/artist pair into its matching key.
#[must_use]
pub fn normalize(title: &str, artist: &str) -> NormalizedKey {
    (title.to_lowercase(), artist.to_lowercase())
}

/// Renders seconds as `m:ss`.
#[must_use]
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} ({}s)", self.title, self.artist, self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_id_is_lowercased() {
        let track = Track::from_metadata("Fix You", "Coldplay", 295);
        assert_eq!(track.id, "fix you_coldplay");
        assert_eq!(track.title, "Fix You");
    }

    #[test]
    fn test_display_format() {
        let track = Track::new("1", "Song B", "Artist B", 210);
        assert_eq!(track.to_string(), "Song B by Artist B (210s)");
    }

    #[test]
    fn test_normalized_key_ignores_case() {
        let a = Track::new("1", "Same", "Artist", 100);
        let b = Track::new("2", "SAME", "artist", 120);
        assert_eq!(a.normalized_key(), b.normalized_key());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(295), "4:55");
        assert_eq!(format_duration(3600), "60:00");
    }
}

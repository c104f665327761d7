//! # Session Module
//!
//! A [`Session`] owns one instance of every container and keeps them in step:
//! adding a track registers it and appends it to the playlist, playing a track
//! logs the play and credits listening time, undoing a play puts the track back
//! at the end of the playlist.
//!
//! The session is single-threaded and holds no locks. A multi-threaded host
//! must serialise access to it.

use crate::config::SessionConfig;
use crate::dedup::DuplicateGuard;
use crate::error::{PlaylistError, Result};
use crate::history::PlaybackLog;
use crate::playlist::Playlist;
use crate::popularity::PopularityRanker;
use crate::rating::{Rating, RatingIndex};
use crate::registry::TrackRegistry;
use crate::snapshot::Snapshot;
use crate::sorting::{sort_tracks, SortKey, SortOrder};
use crate::track::{Track, TrackRef};

/// All containers for one listening session.
///
/// Positional methods share the playlist's 0-based indexing and fail with
/// [`PlaylistError::OutOfRange`] before touching any container.
///
/// # Examples
///
/// ```
/// use playwise::config::SessionConfig;
/// use playwise::session::Session;
///
/// let mut session = Session::with_config(SessionConfig {
///     dedupe_on_add: true,
///     ..SessionConfig::default()
/// });
/// session.add_track("Fix You", "Coldplay", 295);
/// assert!(session.add_track("fix you", "COLDPLAY", 295).is_none());
///
/// session.play(0)?;
/// assert_eq!(session.undo_last_play().map(|t| t.title.clone()), Some("Fix You".to_string()));
/// assert_eq!(session.playlist().len(), 2);
///
/// assert!(session.delete_at(7).is_err());
/// # Ok::<(), playwise::error::PlaylistError>(())
/// ```
#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    registry: TrackRegistry,
    playlist: Playlist,
    guard: DuplicateGuard,
    ratings: RatingIndex,
    favorites: PopularityRanker,
    history: PlaybackLog,
    next_id: u64,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    #[must_use]
    pub fn ratings(&self) -> &RatingIndex {
        &self.ratings
    }

    #[must_use]
    pub fn favorites(&self) -> &PopularityRanker {
        &self.favorites
    }

    #[must_use]
    pub fn history(&self) -> &PlaybackLog {
        &self.history
    }

    /// Creates a track with the next session id, registers it and appends it.
    ///
    /// Returns `None` when `dedupe_on_add` is set and the title/artist pair
    /// was already added.
    pub fn add_track(&mut self, title: &str, artist: &str, duration: u32) -> Option<TrackRef> {
        if self.config.dedupe_on_add && self.guard.is_duplicate(title, artist) {
            log::info!("Refusing duplicate `{title}' by `{artist}'");
            return None;
        }
        self.next_id += 1;
        let track = Track::new(self.next_id.to_string(), title, artist, duration).shared();
        self.registry.put(TrackRef::clone(&track));
        self.playlist.append(TrackRef::clone(&track));
        log::info!("Added `{title}' by `{artist}' as #{}", track.id);
        Some(track)
    }

    /// Removes the track at `index` from the playlist. The registry entry goes
    /// too unless the same track still sits elsewhere in the playlist. Ratings
    /// and listening totals are kept.
    ///
    /// # Errors
    ///
    /// [`PlaylistError::OutOfRange`] for a bad index.
    pub fn delete_at(&mut self, index: usize) -> Result<TrackRef> {
        let track = self.playlist.delete_at(index)?;
        self.forget_if_unreferenced(&track);
        Ok(track)
    }

    /// Moves the track at `from` to position `to`.
    ///
    /// # Errors
    ///
    /// [`PlaylistError::OutOfRange`] when either index is bad, including
    /// `from == to` past the end.
    pub fn move_track(&mut self, from: usize, to: usize) -> Result<()> {
        self.playlist.move_to(from, to)
    }

    pub fn reverse(&mut self) {
        self.playlist.reverse();
    }

    /// Files the track at `index` under `rating`.
    ///
    /// # Errors
    ///
    /// [`PlaylistError::OutOfRange`] for a bad index.
    pub fn rate(&mut self, index: usize, rating: Rating) -> Result<TrackRef> {
        let track = self.playlist.get(index)?;
        self.ratings.insert(TrackRef::clone(&track), rating);
        Ok(track)
    }

    /// Removes every rating entry of the track with `id`.
    ///
    /// # Errors
    ///
    /// [`PlaylistError::UnknownTrack`] when the id is neither registered nor rated.
    pub fn unrate(&mut self, id: &str) -> Result<usize> {
        let removed = self.ratings.delete_by_song_id(id);
        if removed == 0 && self.registry.get(id).is_none() {
            return Err(PlaylistError::UnknownTrack(id.to_string()));
        }
        Ok(removed)
    }

    /// Plays the track at `index` for its full duration.
    ///
    /// # Errors
    ///
    /// [`PlaylistError::OutOfRange`] for a bad index.
    pub fn play(&mut self, index: usize) -> Result<TrackRef> {
        let duration = self.playlist.get(index)?.duration;
        self.play_for(index, duration)
    }

    /// Logs a play of the track at `index` and credits `seconds` of listening.
    ///
    /// # Errors
    ///
    /// [`PlaylistError::OutOfRange`] for a bad index.
    pub fn play_for(&mut self, index: usize, seconds: u32) -> Result<TrackRef> {
        let track = self.playlist.get(index)?;
        self.history.record_play(TrackRef::clone(&track));
        self.favorites.add_listen_time(&track, seconds);
        Ok(track)
    }

    /// Pops the last play and appends that track to the playlist again.
    pub fn undo_last_play(&mut self) -> Option<TrackRef> {
        let track = self.history.undo_last()?;
        self.registry.put(TrackRef::clone(&track));
        self.playlist.append(TrackRef::clone(&track));
        Some(track)
    }

    /// Drops repeated title/artist pairs from the playlist, keeping the first.
    pub fn clean_duplicates(&mut self) -> Vec<TrackRef> {
        let removed = self.guard.clean_playlist(&mut self.playlist);
        for track in &removed {
            self.forget_if_unreferenced(track);
        }
        removed
    }

    /// Snapshot sized by the session config.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            &self.playlist,
            &self.history,
            &self.ratings,
            self.config.snapshot_size,
        )
    }

    /// # Returns
    ///
    /// Up to `k` most-listened tracks, highest total first.
    pub fn top_favorites(&mut self, k: usize) -> Vec<TrackRef> {
        self.favorites.top_k(k)
    }

    #[must_use]
    pub fn search_by_title(&self, title: &str) -> Option<TrackRef> {
        self.registry.get_by_title(title)
    }

    #[must_use]
    pub fn track_by_id(&self, id: &str) -> Option<TrackRef> {
        self.registry.get(id)
    }

    /// The playlist reordered by `key`, leaving the playlist itself untouched.
    #[must_use]
    pub fn sorted_view(&self, key: SortKey, order: SortOrder) -> Vec<TrackRef> {
        sort_tracks(&self.playlist.to_list(), key, order)
    }

    #[must_use]
    pub fn recent_history(&self, limit: usize) -> Vec<TrackRef> {
        self.history.recent_history(limit)
    }

    #[must_use]
    pub fn tracks_rated(&self, rating: Rating) -> Vec<TrackRef> {
        self.ratings.search_by_rating(rating)
    }

    fn forget_if_unreferenced(&mut self, track: &TrackRef) {
        if !self.playlist.iter().any(|t| t.id == track.id) {
            self.registry.remove(track);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(titles: &[&str]) -> Session {
        let mut session = Session::new();
        for (i, title) in titles.iter().enumerate() {
            session.add_track(title, "Artist", 100 * (i as u32 + 1));
        }
        session
    }

    #[test]
    fn test_ids_are_sequential() {
        let session = session_with(&["A", "B"]);
        assert_eq!(session.track_by_id("1").unwrap().title, "A");
        assert_eq!(session.track_by_id("2").unwrap().title, "B");
        assert_eq!(session.search_by_title("b").unwrap().id, "2");
    }

    #[test]
    fn test_dedupe_on_add() {
        let config = SessionConfig {
            dedupe_on_add: true,
            ..SessionConfig::default()
        };
        let mut session = Session::with_config(config);
        assert!(session.add_track("Fix You", "Coldplay", 295).is_some());
        assert!(session.add_track("fix you", "COLDPLAY", 295).is_none());
        assert_eq!(session.playlist().len(), 1);
    }

    #[test]
    fn test_delete_forgets_registry_entry() {
        let mut session = session_with(&["A", "B"]);
        let removed = session.delete_at(0).unwrap();
        assert_eq!(removed.title, "A");
        assert!(session.search_by_title("A").is_none());
        assert!(matches!(session.delete_at(5), Err(PlaylistError::OutOfRange { .. })));
    }

    #[test]
    fn test_play_then_undo_reappends() {
        let mut session = session_with(&["A", "B"]);
        session.play(0).unwrap();
        assert_eq!(session.favorites().total_for("1"), Some(100));

        let undone = session.undo_last_play().unwrap();
        assert_eq!(undone.title, "A");
        let titles: Vec<_> = session.playlist().iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles, ["A", "B", "A"]);
        assert!(session.undo_last_play().is_none());
    }

    #[test]
    fn test_delete_keeps_registry_while_track_still_listed() {
        let mut session = session_with(&["A"]);
        session.play(0).unwrap();
        session.undo_last_play();
        session.delete_at(0).unwrap();
        assert!(session.search_by_title("a").is_some());
    }

    #[test]
    fn test_rate_and_unrate() {
        let mut session = session_with(&["A", "B"]);
        let five = Rating::new(5).unwrap();
        session.rate(0, five).unwrap();
        session.rate(1, five).unwrap();
        assert_eq!(session.tracks_rated(five).len(), 2);

        assert_eq!(session.unrate("1").unwrap(), 1);
        assert_eq!(session.tracks_rated(five).len(), 1);
        assert_eq!(session.unrate("99"), Err(PlaylistError::UnknownTrack("99".to_string())));
        assert!(session.rate(9, five).is_err());
    }

    #[test]
    fn test_clean_duplicates_through_session() {
        let mut session = session_with(&["A", "B", "A"]);
        let removed = session.clean_duplicates();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, "3");
        assert_eq!(session.playlist().len(), 2);
    }

    #[test]
    fn test_sorted_view_leaves_playlist_alone() {
        let session = session_with(&["C", "A", "B"]);
        let sorted = session.sorted_view(SortKey::Title, SortOrder::Ascending);
        let titles: Vec<_> = sorted.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "C"]);
        assert_eq!(session.playlist().get(0).unwrap().title, "C");
    }

    #[test]
    fn test_top_favorites_after_repeated_plays() {
        let mut session = session_with(&["Short", "Long"]);
        session.play(0).unwrap();
        session.play(1).unwrap();
        session.play(0).unwrap();
        session.play(0).unwrap();

        let top: Vec<_> = session.top_favorites(2).iter().map(|t| t.title.clone()).collect();
        assert_eq!(top, ["Short", "Long"]);
        assert_eq!(session.favorites().heap_len(), 4);
    }
}

//! Point-in-time report composed from the playlist, the playback log and the
//! rating index. Every capture recomputes from current state.

use crate::history::PlaybackLog;
use crate::playlist::Playlist;
use crate::rating::RatingIndex;
use crate::sorting::{sort_by, SortOrder};
use crate::track::{format_duration, TrackRef};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Number of entries in each list section unless configured otherwise.
pub const DEFAULT_SNAPSHOT_SIZE: usize = 5;

/// Dashboard data for one moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Longest tracks in the playlist, longest first; equal durations keep
    /// playlist order.
    pub longest: Vec<TrackRef>,
    /// Most recent plays, oldest first.
    pub recent: Vec<TrackRef>,
    /// Entries per rating 1-5.
    pub rating_counts: BTreeMap<u8, usize>,
}

impl Snapshot {
    /// Builds a snapshot with `size` entries per list section.
    #[must_use]
    pub fn capture(
        playlist: &Playlist,
        history: &PlaybackLog,
        ratings: &RatingIndex,
        size: usize,
    ) -> Self {
        let mut longest = sort_by(&playlist.to_list(), |t| t.duration, SortOrder::Descending);
        longest.truncate(size);

        Self {
            longest,
            recent: history.recent_history(size),
            rating_counts: ratings.histogram(),
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Longest tracks:")?;
        if self.longest.is_empty() {
            writeln!(f, "  (playlist is empty)")?;
        }
        for track in &self.longest {
            writeln!(
                f,
                "  - {} by {} ({})",
                track.title,
                track.artist,
                format_duration(track.duration)
            )?;
        }

        writeln!(f, "Recently played:")?;
        if self.recent.is_empty() {
            writeln!(f, "  (nothing played yet)")?;
        }
        for track in &self.recent {
            writeln!(f, "  - {} by {}", track.title, track.artist)?;
        }

        writeln!(f, "Tracks by rating:")?;
        for (rating, count) in &self.rating_counts {
            writeln!(f, "  {rating}: {count}")?;
        }
        Ok(())
    }
}

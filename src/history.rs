//! Last-in-first-out log of played tracks.

use crate::track::TrackRef;

/// Stack of plays; popping is the only form of undo.
#[derive(Debug, Default)]
pub struct PlaybackLog {
    stack: Vec<TrackRef>,
}

impl PlaybackLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_play(&mut self, track: TrackRef) {
        log::debug!("Recorded play of `{}'", track.title);
        self.stack.push(track);
    }

    /// Pops the most recent play, or `None` when nothing has been played.
    pub fn undo_last(&mut self) -> Option<TrackRef> {
        let track = self.stack.pop();
        if let Some(track) = &track {
            log::debug!("Undid play of `{}'", track.title);
        }
        track
    }

    #[must_use]
    pub fn peek_last(&self) -> Option<&TrackRef> {
        self.stack.last()
    }

    /// Up to `limit` most recent plays, oldest first.
    #[must_use]
    pub fn recent_history(&self, limit: usize) -> Vec<TrackRef> {
        let start = self.stack.len().saturating_sub(limit);
        self.stack[start..].to_vec()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

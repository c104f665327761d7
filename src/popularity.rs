//! # Popularity Ranker
//!
//! Tracks cumulative listening time per track and answers "top k most
//! listened" queries.
//!
//! ## Lazy invalidation
//!
//! The authoritative totals live in a map. Every listen event also pushes a
//! fresh `(total, id)` snapshot onto a max-heap without removing the older
//! snapshots of the same track, so an update costs O(log n) instead of a
//! re-heapify. A query pops entries until it has `k` distinct tracks,
//! discarding snapshots of tracks it has already accepted as stale, then pushes
//! *every* popped entry back, stale ones included. The heap therefore never
//! shrinks: it holds every snapshot ever recorded.

use crate::track::TrackRef;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// One snapshot of a track's total at the time it was recorded.
#[derive(Debug, Clone)]
struct HeapEntry {
    total: u64,
    id: String,
    track: TrackRef,
}

// Higher totals rank first; on equal totals the smaller id wins.
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total
            .cmp(&other.total)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

/// Listening-time ranking with a lazily reconciled max-heap.
#[derive(Debug, Default)]
pub struct PopularityRanker {
    heap: BinaryHeap<HeapEntry>,
    totals: HashMap<String, (u64, TrackRef)>,
}

impl PopularityRanker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `seconds` to the track's running total and records a new snapshot.
    ///
    /// Returns the new total.
    pub fn add_listen_time(&mut self, track: &TrackRef, seconds: u32) -> u64 {
        let entry = self
            .totals
            .entry(track.id.clone())
            .or_insert_with(|| (0, TrackRef::clone(track)));
        entry.0 += u64::from(seconds);
        let total = entry.0;

        self.heap.push(HeapEntry {
            total,
            id: track.id.clone(),
            track: TrackRef::clone(track),
        });
        log::debug!(
            "`{}' listened {seconds}s, total now {total}s ({} heap entries)",
            track.title,
            self.heap.len()
        );
        total
    }

    /// The `k` tracks with the highest totals, highest first.
    ///
    /// Takes `&mut self` because the heap is popped while searching; every
    /// entry examined is pushed back before returning.
    ///
    /// # Returns
    ///
    /// At most `k` distinct tracks. Fewer come back when fewer distinct
    /// tracks were ever played, and equal totals rank the smaller id first.
    ///
    /// # Examples
    ///
    /// ```
    /// use playwise::popularity::PopularityRanker;
    /// use playwise::track::Track;
    ///
    /// let fix_you = Track::new("1", "Fix You", "Coldplay", 295).shared();
    /// let queen = Track::new("2", "Bohemian Rhapsody", "Queen", 354).shared();
    ///
    /// let mut ranker = PopularityRanker::new();
    /// ranker.add_listen_time(&fix_you, 300);
    /// ranker.add_listen_time(&queen, 200);
    /// ranker.add_listen_time(&queen, 200);
    ///
    /// let top = ranker.top_k(5);
    /// assert_eq!(top.len(), 2);
    /// assert_eq!(top[0].title, "Bohemian Rhapsody");
    /// assert_eq!(ranker.total_for("1"), Some(300));
    /// ```
    pub fn top_k(&mut self, k: usize) -> Vec<TrackRef> {
        let mut accepted = HashSet::new();
        let mut examined = Vec::new();
        let mut result = Vec::with_capacity(k.min(self.totals.len()));

        while result.len() < k {
            let Some(entry) = self.heap.pop() else {
                break;
            };
            if accepted.insert(entry.id.clone()) {
                result.push(TrackRef::clone(&entry.track));
            } else {
                log::trace!("Skipping stale snapshot {}s for `{}'", entry.total, entry.id);
            }
            examined.push(entry);
        }

        self.heap.extend(examined);
        result
    }

    /// Current authoritative total for `id`.
    #[must_use]
    pub fn total_for(&self, id: &str) -> Option<u64> {
        self.totals.get(id).map(|(total, _)| *total)
    }

    /// Number of snapshots held by the heap, stale ones included.
    #[must_use]
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }

    /// Number of distinct tracks ever played.
    #[must_use]
    pub fn distinct_tracks(&self) -> usize {
        self.totals.len()
    }
}

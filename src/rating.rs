//! # Rating Index
//!
//! A binary search tree keyed by star rating, each node holding the bucket of
//! tracks carrying that rating in insertion order.
//!
//! Ratings are restricted to 1-5 through the [`Rating`] type: raw integers are
//! validated once at the boundary (`Rating::new`), and the tree only ever sees
//! valid keys. With at most five keys the tree never gets deep, so the nodes
//! live in a small arena and every walk is iterative.

use crate::error::{PlaylistError, Result};
use crate::track::TrackRef;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A validated star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// # Errors
    ///
    /// Returns [`PlaylistError::InvalidRating`] for values outside `1..=5`.
    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PlaylistError::InvalidRating(value))
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Every valid rating, lowest first.
    pub fn all() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).map(Rating)
    }
}

impl TryFrom<u8> for Rating {
    type Error = PlaylistError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct RatingNode {
    rating: Rating,
    tracks: Vec<TrackRef>,
    left: Option<usize>,
    right: Option<usize>,
}

/// BST of rating buckets.
#[derive(Debug, Default)]
pub struct RatingIndex {
    nodes: Vec<RatingNode>,
    root: Option<usize>,
}

impl RatingIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `track` to the bucket for `rating`, creating the bucket if needed.
    /// The same track may be inserted repeatedly; every insertion is kept.
    pub fn insert(&mut self, track: TrackRef, rating: Rating) {
        log::debug!("Rating `{}' with {rating}", track.title);
        let mut link = self.root;
        let mut parent: Option<(usize, bool)> = None;

        while let Some(idx) = link {
            let node = &mut self.nodes[idx];
            if rating < node.rating {
                parent = Some((idx, true));
                link = node.left;
            } else if rating > node.rating {
                parent = Some((idx, false));
                link = node.right;
            } else {
                node.tracks.push(track);
                return;
            }
        }

        let idx = self.nodes.len();
        self.nodes.push(RatingNode {
            rating,
            tracks: vec![track],
            left: None,
            right: None,
        });
        match parent {
            None => self.root = Some(idx),
            Some((p, true)) => self.nodes[p].left = Some(idx),
            Some((p, false)) => self.nodes[p].right = Some(idx),
        }
    }

    /// Tracks rated `rating`, in insertion order. Empty when no bucket exists.
    #[must_use]
    pub fn search_by_rating(&self, rating: Rating) -> Vec<TrackRef> {
        self.find(rating)
            .map(|idx| self.nodes[idx].tracks.clone())
            .unwrap_or_default()
    }

    /// Removes every entry whose track id is `id` from every bucket.
    ///
    /// Returns the number of entries removed. Emptied buckets stay in the tree.
    pub fn delete_by_song_id(&mut self, id: &str) -> usize {
        let mut removed = 0;
        for node in &mut self.nodes {
            let before = node.tracks.len();
            node.tracks.retain(|track| track.id != id);
            removed += before - node.tracks.len();
        }
        log::debug!("Purged {removed} rating entries for `{id}'");
        removed
    }

    /// All tracks ordered by ascending rating, each bucket in insertion order.
    #[must_use]
    pub fn in_order(&self) -> Vec<TrackRef> {
        self.walk_in_order()
            .into_iter()
            .flat_map(|idx| self.nodes[idx].tracks.iter().cloned())
            .collect()
    }

    /// Count of entries per rating, with 0 for ratings nobody used.
    #[must_use]
    pub fn histogram(&self) -> BTreeMap<u8, usize> {
        let mut counts: BTreeMap<u8, usize> = Rating::all().map(|r| (r.value(), 0)).collect();
        for node in &self.nodes {
            *counts.entry(node.rating.value()).or_default() += node.tracks.len();
        }
        counts
    }

    /// Total entries across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().map(|node| node.tracks.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct rating keys present in the tree.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.nodes.len()
    }

    fn find(&self, rating: Rating) -> Option<usize> {
        let mut link = self.root;
        while let Some(idx) = link {
            let node = &self.nodes[idx];
            link = match rating.cmp(&node.rating) {
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
                std::cmp::Ordering::Equal => return Some(idx),
            };
        }
        None
    }

    /// Node indices in key order, using an explicit stack.
    fn walk_in_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut current = self.root;

        while current.is_some() || !stack.is_empty() {
            while let Some(idx) = current {
                stack.push(idx);
                current = self.nodes[idx].left;
            }
            if let Some(idx) = stack.pop() {
                order.push(idx);
                current = self.nodes[idx].right;
            }
        }
        order
    }
}

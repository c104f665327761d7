//! # Playlist Module
//!
//! The ordered, mutable sequence of tracks that represents the current
//! playback order.
//!
//! ## Layout
//!
//! The playlist is a doubly linked list whose nodes live in an arena of
//! generation-tagged slots and point at each other by slot index. Freed slots
//! are kept on a free list and recycled by later appends. This keeps ownership
//! of every node inside the [`Playlist`] while still giving O(1) unlinking once
//! a node is known through its [`NodeHandle`].
//!
//! ## Positions
//!
//! Every positional operation counts from the current head, 0-indexed. There is
//! no "reversed" flag: [`Playlist::reverse`] physically swaps the links, so
//! position `0` is always whatever the head is right now.
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `append` | O(1) |
//! | `get`, `delete_at` | O(i) |
//! | `move_to` | O(from + to) |
//! | `reverse`, `to_list` | O(n) |
//! | `remove_handle` | O(1) |

use crate::error::{PlaylistError, Result};
use crate::track::TrackRef;

/// Stable reference to a node inside a [`Playlist`].
///
/// A handle stays valid until its node is removed. The slot may then be reused
/// by a later append, but its generation moves on, so the old handle never
/// resolves to the new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    slot: usize,
    generation: u32,
}

#[derive(Debug)]
struct Node {
    track: TrackRef,
    prev: Option<usize>,
    next: Option<usize>,
}

/// One arena cell. `generation` is bumped every time the cell is freed.
#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Doubly linked playlist backed by a node arena.
///
/// # Examples
///
/// ```
/// use playwise::playlist::Playlist;
/// use playwise::track::Track;
///
/// let mut playlist = Playlist::new();
/// playlist.append(Track::from_metadata("Fix You", "Coldplay", 295).shared());
/// playlist.append(Track::from_metadata("Lose Yourself", "Eminem", 326).shared());
///
/// playlist.move_to(1, 0)?;
/// assert_eq!(playlist.get(0)?.title, "Lose Yourself");
///
/// // Out-of-range positions are rejected without touching the links.
/// assert!(playlist.move_to(0, 2).is_err());
/// assert_eq!(playlist.len(), 2);
/// # Ok::<(), playwise::error::PlaylistError>(())
/// ```
#[derive(Debug, Default)]
pub struct Playlist {
    nodes: Vec<Slot>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl Playlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds a track at the tail.
    ///
    /// # Returns
    ///
    /// A [`NodeHandle`] for O(1) removal through [`Playlist::remove_handle`].
    pub fn append(&mut self, track: TrackRef) -> NodeHandle {
        log::debug!("Appending `{}' at position {}", track.title, self.len);
        let slot = self.alloc(track);
        self.link_before(slot, None);
        self.handle(slot)
    }

    /// Removes the track at `index` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`PlaylistError::OutOfRange`] when `index >= len`; the playlist is
    /// left untouched in that case.
    pub fn delete_at(&mut self, index: usize) -> Result<TrackRef> {
        self.check(index)?;
        let slot = self.slot_at(index);
        self.unlink(slot);
        let track = self.release(slot);
        log::debug!("Deleted `{}' from position {index}", track.title);
        Ok(track)
    }

    /// Moves the track at `from` so that it ends up at position `to`, keeping
    /// the relative order of every other track.
    ///
    /// # Errors
    ///
    /// Returns [`PlaylistError::OutOfRange`] when either index is `>= len`.
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<()> {
        self.check(from)?;
        self.check(to)?;
        if from == to {
            return Ok(());
        }

        let slot = self.slot_at(from);
        self.unlink(slot);

        // After the unlink the list holds len nodes, so `to == len` means the new tail.
        if to == 0 {
            let head = self.head;
            self.link_before(slot, head);
        } else if to == self.len {
            self.link_before(slot, None);
        } else {
            let target = self.slot_at(to);
            self.link_before(slot, Some(target));
        }

        log::debug!("Moved track from position {from} to {to}");
        Ok(())
    }

    /// Reverses the playlist in place by swapping every node's links.
    pub fn reverse(&mut self) {
        let mut current = self.head;
        while let Some(slot) = current {
            let node = self.node_mut(slot);
            std::mem::swap(&mut node.prev, &mut node.next);
            // The old `next` now lives in `prev`.
            current = node.prev;
        }
        std::mem::swap(&mut self.head, &mut self.tail);
        log::debug!("Reversed playlist of {} tracks", self.len);
    }

    /// Returns the track at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PlaylistError::OutOfRange`] when `index >= len`.
    pub fn get(&self, index: usize) -> Result<TrackRef> {
        self.check(index)?;
        Ok(TrackRef::clone(&self.node(self.slot_at(index)).track))
    }

    /// Collects the tracks from head to tail.
    #[must_use]
    pub fn to_list(&self) -> Vec<TrackRef> {
        self.iter().cloned().collect()
    }

    /// Drops every node. Handles taken before the clear stop resolving.
    pub fn clear(&mut self) {
        for slot in 0..self.nodes.len() {
            if self.nodes[slot].node.is_some() {
                self.release(slot);
            }
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates over the tracks from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            playlist: self,
            current: self.head,
        }
    }

    /// Handle of the head node, if any.
    #[must_use]
    pub fn first_handle(&self) -> Option<NodeHandle> {
        self.head.map(|slot| self.handle(slot))
    }

    /// Handle of the node following `handle`.
    #[must_use]
    pub fn next_handle(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.live(handle)?.next.map(|slot| self.handle(slot))
    }

    /// Track stored at `handle`, or `None` if the node was removed.
    #[must_use]
    pub fn track_at(&self, handle: NodeHandle) -> Option<TrackRef> {
        self.live(handle).map(|node| TrackRef::clone(&node.track))
    }

    /// Unlinks the node behind `handle` in O(1).
    ///
    /// Returns `None` when the handle no longer refers to a live node.
    pub fn remove_handle(&mut self, handle: NodeHandle) -> Option<TrackRef> {
        self.live(handle)?;
        self.unlink(handle.slot);
        Some(self.release(handle.slot))
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.len {
            Ok(())
        } else {
            Err(PlaylistError::OutOfRange {
                index,
                len: self.len,
            })
        }
    }

    /// Walks from the head to `index`. Callers bounds-check first.
    fn slot_at(&self, index: usize) -> usize {
        let mut slot = self.head.expect("bounds-checked index on non-empty playlist");
        for _ in 0..index {
            slot = self.node(slot).next.expect("bounds-checked index within chain");
        }
        slot
    }

    fn handle(&self, slot: usize) -> NodeHandle {
        NodeHandle {
            slot,
            generation: self.nodes[slot].generation,
        }
    }

    /// Resolves a handle, rejecting freed or recycled slots.
    fn live(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes
            .get(handle.slot)
            .filter(|cell| cell.generation == handle.generation)
            .and_then(|cell| cell.node.as_ref())
    }

    fn node(&self, slot: usize) -> &Node {
        self.nodes[slot].node.as_ref().expect("linked slot holds a node")
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node {
        self.nodes[slot].node.as_mut().expect("linked slot holds a node")
    }

    fn alloc(&mut self, track: TrackRef) -> usize {
        let node = Node {
            track,
            prev: None,
            next: None,
        };
        if let Some(slot) = self.free.pop() {
            self.nodes[slot].node = Some(node);
            slot
        } else {
            self.nodes.push(Slot {
                generation: 0,
                node: Some(node),
            });
            self.nodes.len() - 1
        }
    }

    fn release(&mut self, slot: usize) -> TrackRef {
        let cell = &mut self.nodes[slot];
        let node = cell.node.take().expect("released slot holds a node");
        cell.generation = cell.generation.wrapping_add(1);
        self.free.push(slot);
        node.track
    }

    /// Detaches `slot` from its neighbours and fixes head/tail.
    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = self.node(slot);
            (node.prev, node.next)
        };
        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
        let node = self.node_mut(slot);
        node.prev = None;
        node.next = None;
        self.len -= 1;
    }

    /// Links a detached `slot` right before `target`, or at the tail when
    /// `target` is `None`.
    fn link_before(&mut self, slot: usize, target: Option<usize>) {
        let prev = match target {
            Some(t) => self.node(t).prev,
            None => self.tail,
        };
        {
            let node = self.node_mut(slot);
            node.prev = prev;
            node.next = target;
        }
        match prev {
            Some(p) => self.node_mut(p).next = Some(slot),
            None => self.head = Some(slot),
        }
        match target {
            Some(t) => self.node_mut(t).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.len += 1;
    }
}

/// Iterator over a playlist's tracks, head first.
pub struct Iter<'a> {
    playlist: &'a Playlist,
    current: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a TrackRef;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.playlist.node(self.current?);
        self.current = node.next;
        Some(&node.track)
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a TrackRef;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

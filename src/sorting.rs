//! Stable merge sort used to materialise alternate orderings of a playlist.
//!
//! [`sort_by`] never touches its input and keeps equal-keyed elements in their
//! input order for both ascending and descending sorts.

use crate::track::TrackRef;
use anyhow::bail;
use std::cmp::Ordering;
use std::str::FromStr;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Track attribute to order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Case-insensitive title.
    Title,
    /// Case-insensitive artist.
    Artist,
    Duration,
    /// Playlist order as given.
    Added,
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "artist" => Ok(Self::Artist),
            "duration" => Ok(Self::Duration),
            "added" | "recent" => Ok(Self::Added),
            other => bail!("Unknown sort key: {other}. Use title, artist, duration or added"),
        }
    }
}

/// Sorts a copy of `items` by the key `key` extracts.
///
/// Splits at the midpoint, sorts both halves and merges them, taking from the
/// left half whenever its front element does not come strictly after the
/// right half's. O(n log n) time, O(n) extra space.
#[must_use]
pub fn sort_by<T, K, F>(items: &[T], key: F, order: SortOrder) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    merge_sort(items, &key, order)
}

fn merge_sort<T, K, F>(items: &[T], key: &F, order: SortOrder) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    if items.len() <= 1 {
        return items.to_vec();
    }
    let mid = items.len() / 2;
    let left = merge_sort(&items[..mid], key, order);
    let right = merge_sort(&items[mid..], key, order);
    merge(left, right, key, order)
}

fn merge<T, K, F>(left: Vec<T>, right: Vec<T>, key: &F, order: SortOrder) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let ordering = match order {
            SortOrder::Ascending => key(l).cmp(&key(r)),
            SortOrder::Descending => key(r).cmp(&key(l)),
        };
        // Ties go to the left half.
        let next = if ordering == Ordering::Greater {
            right.next()
        } else {
            left.next()
        };
        merged.extend(next);
    }

    merged.extend(left);
    merged.extend(right);
    merged
}

/// Sorts tracks by one of the common attributes.
#[must_use]
pub fn sort_tracks(tracks: &[TrackRef], key: SortKey, order: SortOrder) -> Vec<TrackRef> {
    match key {
        SortKey::Title => sort_by(tracks, |t| t.title.to_lowercase(), order),
        SortKey::Artist => sort_by(tracks, |t| t.artist.to_lowercase(), order),
        SortKey::Duration => sort_by(tracks, |t| t.duration, order),
        SortKey::Added => match order {
            SortOrder::Ascending => tracks.to_vec(),
            SortOrder::Descending => tracks.iter().rev().cloned().collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;

    fn tracks(data: &[(&str, u32)]) -> Vec<TrackRef> {
        data.iter()
            .enumerate()
            .map(|(i, (title, duration))| {
                Track::new(i.to_string(), *title, "Artist", *duration).shared()
            })
            .collect()
    }

    fn titles(tracks: &[TrackRef]) -> Vec<&str> {
        tracks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_sort_by_title_ascending() {
        let input = tracks(&[("C", 100), ("A", 200), ("B", 150)]);
        let sorted = sort_by(&input, |t| t.title.clone(), SortOrder::Ascending);
        assert_eq!(titles(&sorted), ["A", "B", "C"]);
        assert_eq!(titles(&input), ["C", "A", "B"], "input must not be mutated");
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let input = tracks(&[("X", 100), ("Y", 50), ("Z", 100), ("W", 50)]);

        let ascending = sort_by(&input, |t| t.duration, SortOrder::Ascending);
        assert_eq!(titles(&ascending), ["Y", "W", "X", "Z"]);

        let descending = sort_by(&input, |t| t.duration, SortOrder::Descending);
        assert_eq!(titles(&descending), ["X", "Z", "Y", "W"]);
    }

    #[test]
    fn test_plain_values() {
        let numbers = [5, 3, 9, 1, 3, 7, 2, 8, 6, 4];
        let sorted = sort_by(&numbers, |n| *n, SortOrder::Ascending);
        assert_eq!(sorted, [1, 2, 3, 3, 4, 5, 6, 7, 8, 9]);

        let empty: [u32; 0] = [];
        assert!(sort_by(&empty, |n| *n, SortOrder::Descending).is_empty());
    }

    #[test]
    fn test_sort_tracks_case_insensitive_title() {
        let input = tracks(&[("banana", 1), ("Apple", 2), ("cherry", 3)]);
        let sorted = sort_tracks(&input, SortKey::Title, SortOrder::Ascending);
        assert_eq!(titles(&sorted), ["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_sort_tracks_added_order() {
        let input = tracks(&[("A", 1), ("B", 2), ("C", 3)]);
        let ascending = sort_tracks(&input, SortKey::Added, SortOrder::Ascending);
        assert_eq!(titles(&ascending), ["A", "B", "C"]);
        let descending = sort_tracks(&input, SortKey::Added, SortOrder::Descending);
        assert_eq!(titles(&descending), ["C", "B", "A"]);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("Duration".parse::<SortKey>().unwrap(), SortKey::Duration);
        assert_eq!("recent".parse::<SortKey>().unwrap(), SortKey::Added);
        assert!("bpm".parse::<SortKey>().is_err());
    }
}

//! Sorted, disjoint half-open ranges.

use serde::{Deserialize, Serialize};

/// A set of `[start, end)` ranges kept sorted and merged.
///
/// Overlapping and touching ranges coalesce on insertion, so the ranges
/// returned by [`Ranges::iter`] never overlap or abut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranges<T> {
    ranges: Vec<(T, T)>,
}

impl<T> Default for Ranges<T> {
    fn default() -> Self {
        Self { ranges: Vec::new() }
    }
}

impl<T: Copy + Ord> Ranges<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `[start, end)`. Empty or inverted ranges are ignored.
    pub fn add(&mut self, start: T, end: T) {
        if start >= end {
            return;
        }

        // First range that could touch the new one.
        let first = self.ranges.partition_point(|&(_, existing_end)| existing_end < start);
        // One past the last range that could touch the new one.
        let last = self.ranges.partition_point(|&(existing_start, _)| existing_start <= end);

        if first == last {
            self.ranges.insert(first, (start, end));
            return;
        }

        let merged_start = start.min(self.ranges[first].0);
        let merged_end = end.max(self.ranges[last - 1].1);
        self.ranges.drain(first..last);
        self.ranges.insert(first, (merged_start, merged_end));
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn start(&self, index: usize) -> Option<T> {
        self.ranges.get(index).map(|&(start, _)| start)
    }

    pub fn end(&self, index: usize) -> Option<T> {
        self.ranges.get(index).map(|&(_, end)| end)
    }

    pub fn iter(&self) -> impl Iterator<Item = (T, T)> + '_ {
        self.ranges.iter().copied()
    }

    pub fn contains(&self, value: T) -> bool {
        self.ranges
            .iter()
            .any(|&(start, end)| start <= value && value < end)
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}

impl<T: Copy + Ord> FromIterator<(T, T)> for Ranges<T> {
    fn from_iter<I: IntoIterator<Item = (T, T)>>(iter: I) -> Self {
        let mut ranges = Ranges::new();
        for (start, end) in iter {
            ranges.add(start, end);
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn collect(ranges: &Ranges<u64>) -> Vec<(u64, u64)> {
        ranges.iter().collect()
    }

    #[test]
    fn test_disjoint_ranges_stay_sorted() {
        let mut ranges = Ranges::new();
        ranges.add(50, 60);
        ranges.add(0, 10);
        ranges.add(20, 30);

        assert_eq!(collect(&ranges), vec![(0, 10), (20, 30), (50, 60)]);
        assert_eq!(ranges.start(1), Some(20));
        assert_eq!(ranges.end(2), Some(60));
        assert_eq!(ranges.end(3), None);
    }

    #[test]
    fn test_overlapping_ranges_merge() {
        let mut ranges = Ranges::new();
        ranges.add(0, 10);
        ranges.add(20, 30);
        ranges.add(40, 50);
        ranges.add(5, 45);

        assert_eq!(collect(&ranges), vec![(0, 50)]);
    }

    #[test]
    fn test_adjacent_ranges_merge() {
        let mut ranges = Ranges::new();
        ranges.add(0, 10);
        ranges.add(10, 20);
        ranges.add(30, 40);
        ranges.add(20, 30);

        assert_eq!(collect(&ranges), vec![(0, 40)]);
    }

    #[test]
    fn test_contained_range_is_absorbed() {
        let mut ranges = Ranges::new();
        ranges.add(0, 100);
        ranges.add(10, 20);

        assert_eq!(collect(&ranges), vec![(0, 100)]);
        assert!(ranges.contains(99));
        assert!(!ranges.contains(100));
    }

    #[test]
    fn test_empty_and_inverted_ranges_are_ignored() {
        let mut ranges = Ranges::new();
        ranges.add(5, 5);
        ranges.add(9, 3);
        assert!(ranges.is_empty());
    }

    #[test]
    fn test_duration_ranges() {
        let ranges: Ranges<Duration> = [
            (Duration::from_secs(0), Duration::from_secs(2)),
            (Duration::from_secs(1), Duration::from_secs(3)),
        ]
        .into_iter()
        .collect();

        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges.end(0), Some(Duration::from_secs(3)));
    }
}

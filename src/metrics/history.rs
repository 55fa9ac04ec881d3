//! Bounded snapshot history for charts

use super::TrafficSnapshot;
use crate::types::HistorySize;
use std::collections::VecDeque;

/// Ring buffer of the most recent snapshots
///
/// Insertion order defines recency. Once `max_size` snapshots are held, each
/// push evicts exactly the oldest one.
#[derive(Debug, Clone)]
pub struct TrafficHistory {
    snapshots: VecDeque<TrafficSnapshot>,
    max_size: HistorySize,
}

impl TrafficHistory {
    /// Create an empty history holding at most `max_size` snapshots
    #[must_use]
    pub fn new(max_size: HistorySize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(max_size.get()),
            max_size,
        }
    }

    /// Append a snapshot, evicting the oldest when full
    pub fn push(&mut self, snapshot: TrafficSnapshot) {
        if self.snapshots.len() >= self.max_size.get() {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Most recent `min(n, len)` snapshots, oldest first (returns a copy)
    #[must_use]
    pub fn last(&self, n: usize) -> Vec<TrafficSnapshot> {
        let skip = self.snapshots.len().saturating_sub(n);
        self.snapshots.iter().skip(skip).cloned().collect()
    }

    /// Newest snapshot, if any
    #[must_use]
    pub fn latest(&self) -> Option<&TrafficSnapshot> {
        self.snapshots.back()
    }

    /// Chart points for the most recent `n` snapshots
    ///
    /// X is the position within the returned window (0 = oldest), Y is
    /// whatever `value` extracts from each snapshot.
    pub fn series<F>(&self, n: usize, value: F) -> Vec<(f64, f64)>
    where
        F: Fn(&TrafficSnapshot) -> f64,
    {
        let skip = self.snapshots.len().saturating_sub(n);
        self.snapshots
            .iter()
            .skip(skip)
            .enumerate()
            .map(|(i, snapshot)| (i as f64, value(snapshot)))
            .collect()
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[must_use]
    #[inline]
    pub fn max_size(&self) -> HistorySize {
        self.max_size
    }
}

impl Default for TrafficHistory {
    fn default() -> Self {
        Self::new(HistorySize::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(total_queries: u64) -> TrafficSnapshot {
        TrafficSnapshot {
            total_queries,
            ..TrafficSnapshot::default()
        }
    }

    fn totals(snapshots: &[TrafficSnapshot]) -> Vec<u64> {
        snapshots.iter().map(|s| s.total_queries).collect()
    }

    #[test]
    fn test_evicts_oldest() {
        let mut history = TrafficHistory::new(HistorySize::new(3).unwrap());
        for i in 1..=5 {
            history.push(snapshot(i));
            assert!(history.len() <= 3);
        }
        assert_eq!(totals(&history.last(3)), vec![3, 4, 5]);
        assert_eq!(history.latest().map(|s| s.total_queries), Some(5));
    }

    #[test]
    fn test_last_clamps_to_len() {
        let mut history = TrafficHistory::default();
        history.push(snapshot(1));
        history.push(snapshot(2));
        assert_eq!(totals(&history.last(10)), vec![1, 2]);
        assert_eq!(totals(&history.last(1)), vec![2]);
        assert!(history.last(0).is_empty());
    }

    #[test]
    fn test_last_returns_independent_copy() {
        let mut history = TrafficHistory::new(HistorySize::new(2).unwrap());
        history.push(snapshot(1));

        let mut copy = history.last(1);
        copy[0].total_queries = 99;
        assert_eq!(totals(&history.last(1)), vec![1]);
    }

    #[test]
    fn test_empty_history() {
        let history = TrafficHistory::new(HistorySize::new(4).unwrap());
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert!(history.last(4).is_empty());
        assert_eq!(history.max_size().get(), 4);
    }

    #[test]
    fn test_series_points() {
        let mut history = TrafficHistory::new(HistorySize::new(3).unwrap());
        for i in 1..=4 {
            history.push(snapshot(i * 10));
        }
        let points = history.series(2, |s| s.total_queries as f64);
        assert_eq!(points, vec![(0.0, 30.0), (1.0, 40.0)]);
    }
}

//! Traffic snapshot type and methods
//!
//! Contains the immutable TrafficSnapshot struct with pure methods for
//! deriving display values from its counters.

use super::StatementType;
use crate::formatting::{format_bytes, format_duration};
use crate::stats::LatencyBuckets;
use crate::types::QueriesPerSecond;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime};

/// Point-in-time traffic record produced on each sampling tick
///
/// Snapshots are never mutated after the collector builds them. Counters are
/// cumulative since the collector was created; `queries_per_second` is the
/// instantaneous rate between the previous tick and this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    pub timestamp: SystemTime,

    // Connections (reported by the counter source)
    pub active_connections: usize,
    pub total_connections: u64,

    // Queries
    pub queries_per_second: QueriesPerSecond,
    pub total_queries: u64,
    /// Rolling average over the most recent query latencies
    pub average_query_time: Duration,

    // Per statement type
    pub select_count: u64,
    pub insert_count: u64,
    pub update_count: u64,
    pub delete_count: u64,

    pub slow_queries: u64,
    pub slow_query_threshold: Duration,

    // Data transfer (reported by the counter source)
    pub bytes_read: u64,
    pub bytes_written: u64,

    pub error_count: u64,
    pub last_error: Option<String>,
    pub last_error_time: Option<SystemTime>,

    /// Latency distribution of every query recorded so far
    pub latency: LatencyBuckets,
}

impl Default for TrafficSnapshot {
    fn default() -> Self {
        Self {
            timestamp: SystemTime::UNIX_EPOCH,
            active_connections: 0,
            total_connections: 0,
            queries_per_second: QueriesPerSecond::zero(),
            total_queries: 0,
            average_query_time: Duration::ZERO,
            select_count: 0,
            insert_count: 0,
            update_count: 0,
            delete_count: 0,
            slow_queries: 0,
            slow_query_threshold: Duration::ZERO,
            bytes_read: 0,
            bytes_written: 0,
            error_count: 0,
            last_error: None,
            last_error_time: None,
            latency: LatencyBuckets::default(),
        }
    }
}

impl TrafficSnapshot {
    /// Whether this is the zero value returned before the first tick
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamp == SystemTime::UNIX_EPOCH
    }

    /// Counter for one statement type (`Other` is the remainder of the total)
    #[must_use]
    pub fn statement_count(&self, kind: StatementType) -> u64 {
        match kind {
            StatementType::Select => self.select_count,
            StatementType::Insert => self.insert_count,
            StatementType::Update => self.update_count,
            StatementType::Delete => self.delete_count,
            StatementType::Other => self.total_queries.saturating_sub(
                self.select_count
                    .saturating_add(self.insert_count)
                    .saturating_add(self.update_count)
                    .saturating_add(self.delete_count),
            ),
        }
    }

    /// Get total bytes transferred in both directions
    #[must_use]
    #[inline]
    pub fn total_bytes(&self) -> u64 {
        self.bytes_read.saturating_add(self.bytes_written)
    }

    /// Error rate as a percentage of recorded queries
    ///
    /// Returns 0.0 when no queries have been recorded.
    #[must_use]
    pub fn error_rate_percent(&self) -> f64 {
        if self.total_queries == 0 {
            0.0
        } else {
            (self.error_count as f64 / self.total_queries as f64) * 100.0
        }
    }

    /// Average query latency in fractional milliseconds (for charting)
    #[must_use]
    #[inline]
    pub fn average_latency_ms(&self) -> f64 {
        self.average_query_time.as_nanos() as f64 / 1_000_000.0
    }
}

impl fmt::Display for TrafficSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "qps={} total={} avg={} slow={} conns={}/{} read={} written={} errors={}",
            self.queries_per_second,
            self.total_queries,
            format_duration(self.average_query_time),
            self.slow_queries,
            self.active_connections,
            self.total_connections,
            format_bytes(self.bytes_read),
            format_bytes(self.bytes_written),
            self.error_count,
        )?;
        if let Some(err) = &self.last_error {
            write!(f, " last_error={err:?}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TrafficSnapshot {
        TrafficSnapshot {
            timestamp: SystemTime::now(),
            total_queries: 20,
            select_count: 10,
            insert_count: 4,
            update_count: 2,
            delete_count: 1,
            error_count: 5,
            bytes_read: 1_024,
            bytes_written: 512,
            ..TrafficSnapshot::default()
        }
    }

    #[test]
    fn test_default_is_empty() {
        let snapshot = TrafficSnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.error_rate_percent(), 0.0);
        assert_eq!(snapshot.total_bytes(), 0);
        assert!(!sample().is_empty());
    }

    #[test]
    fn test_statement_counts() {
        let snapshot = sample();
        assert_eq!(snapshot.statement_count(StatementType::Select), 10);
        assert_eq!(snapshot.statement_count(StatementType::Delete), 1);
        assert_eq!(snapshot.statement_count(StatementType::Other), 3);
    }

    #[test]
    fn test_error_rate_and_bytes() {
        let snapshot = sample();
        assert_eq!(snapshot.error_rate_percent(), 25.0);
        assert_eq!(snapshot.total_bytes(), 1_536);
    }

    #[test]
    fn test_counters_near_u64_max_saturate() {
        let snapshot = TrafficSnapshot {
            total_queries: u64::MAX,
            select_count: u64::MAX,
            insert_count: 1,
            bytes_read: u64::MAX - 1,
            bytes_written: 10,
            ..TrafficSnapshot::default()
        };
        assert_eq!(snapshot.total_bytes(), u64::MAX);
        assert_eq!(snapshot.statement_count(StatementType::Other), 0);
    }

    #[test]
    fn test_average_latency_ms() {
        let snapshot = TrafficSnapshot {
            average_query_time: Duration::from_micros(1_500),
            ..TrafficSnapshot::default()
        };
        assert_eq!(snapshot.average_latency_ms(), 1.5);
    }

    #[test]
    fn test_display_summary() {
        let mut snapshot = sample();
        snapshot.last_error = Some("disk I/O error".to_string());
        let line = snapshot.to_string();
        assert!(line.contains("total=20"));
        assert!(line.contains("read=1.00 KB"));
        assert!(line.contains("errors=5"));
        assert!(line.ends_with("last_error=\"disk I/O error\""));
    }
}

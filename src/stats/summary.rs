//! Aggregate statistics over a window of snapshots

use super::percentile;
use crate::metrics::TrafficSnapshot;
use crate::types::BytesPerSecond;
use serde::Serialize;
use std::time::Duration;

/// Summary of a sequence of snapshots, typically a collector's history
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TrafficStats {
    /// Time between the first and last snapshot
    pub period: Duration,
    pub total_queries: u64,
    pub total_errors: u64,
    pub average_qps: f64,
    pub peak_qps: f64,
    pub average_latency: Duration,
    pub p95_latency: Duration,
    pub p99_latency: Duration,
    /// Errors as a percentage of queries
    pub error_rate: f64,
    pub average_connections: f64,
    pub peak_connections: usize,
    /// Bytes read per second across the period
    pub read_throughput: BytesPerSecond,
    /// Bytes written per second across the period
    pub write_throughput: BytesPerSecond,
}

impl TrafficStats {
    /// Summarize `snapshots`, ordered oldest first
    ///
    /// Cumulative totals come from the newest snapshot. Latency percentiles
    /// are taken over each snapshot's rolling average latency.
    #[must_use]
    pub fn from_snapshots(snapshots: &[TrafficSnapshot]) -> Self {
        let (Some(first), Some(last)) = (snapshots.first(), snapshots.last()) else {
            return Self::default();
        };

        let count = snapshots.len() as f64;
        let period = last
            .timestamp
            .duration_since(first.timestamp)
            .unwrap_or_default();

        let qps: Vec<f64> = snapshots
            .iter()
            .map(|s| s.queries_per_second.get())
            .collect();
        let latencies: Vec<f64> = snapshots
            .iter()
            .map(|s| s.average_query_time.as_secs_f64())
            .collect();

        let throughput = |start: u64, end: u64| {
            let secs = period.as_secs_f64();
            if secs > 0.0 {
                BytesPerSecond::new(end.saturating_sub(start) as f64 / secs)
            } else {
                BytesPerSecond::zero()
            }
        };

        let total_connections: usize = snapshots.iter().map(|s| s.active_connections).sum();

        Self {
            period,
            total_queries: last.total_queries,
            total_errors: last.error_count,
            average_qps: qps.iter().sum::<f64>() / count,
            peak_qps: qps.iter().copied().fold(0.0, f64::max),
            average_latency: seconds(latencies.iter().sum::<f64>() / count),
            p95_latency: seconds(percentile(&latencies, 95.0)),
            p99_latency: seconds(percentile(&latencies, 99.0)),
            error_rate: last.error_rate_percent(),
            average_connections: total_connections as f64 / count,
            peak_connections: snapshots
                .iter()
                .map(|s| s.active_connections)
                .max()
                .unwrap_or(0),
            read_throughput: throughput(first.bytes_read, last.bytes_read),
            write_throughput: throughput(first.bytes_written, last.bytes_written),
        }
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn snapshot(offset_secs: u64, qps: f64, latency_ms: u64, connections: usize) -> TrafficSnapshot {
        TrafficSnapshot {
            timestamp: SystemTime::UNIX_EPOCH + Duration::from_secs(offset_secs),
            queries_per_second: qps.into(),
            average_query_time: Duration::from_millis(latency_ms),
            active_connections: connections,
            ..TrafficSnapshot::default()
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(TrafficStats::from_snapshots(&[]), TrafficStats::default());
    }

    #[test]
    fn test_summary_over_window() {
        let mut snapshots = vec![
            snapshot(0, 10.0, 10, 2),
            snapshot(1, 30.0, 20, 4),
            snapshot(2, 20.0, 30, 3),
        ];
        snapshots[2].total_queries = 200;
        snapshots[2].error_count = 5;
        snapshots[2].bytes_read = 4_000;

        let stats = TrafficStats::from_snapshots(&snapshots);
        assert_eq!(stats.period, Duration::from_secs(2));
        assert_eq!(stats.total_queries, 200);
        assert_eq!(stats.total_errors, 5);
        assert!((stats.average_qps - 20.0).abs() < 1e-9);
        assert!((stats.peak_qps - 30.0).abs() < 1e-9);
        assert!((stats.average_latency.as_secs_f64() - 0.020).abs() < 1e-9);
        assert_eq!(stats.p99_latency, Duration::from_millis(20));
        assert!((stats.error_rate - 2.5).abs() < 1e-9);
        assert!((stats.average_connections - 3.0).abs() < 1e-9);
        assert_eq!(stats.peak_connections, 4);
        assert_eq!(stats.read_throughput.get(), 2_000.0);
        assert_eq!(stats.write_throughput, BytesPerSecond::zero());
    }

    #[test]
    fn test_single_snapshot_has_zero_period() {
        let stats = TrafficStats::from_snapshots(&[snapshot(5, 1.0, 3, 1)]);
        assert_eq!(stats.period, Duration::ZERO);
        assert_eq!(stats.p95_latency, Duration::from_millis(3));
        assert_eq!(stats.read_throughput, BytesPerSecond::zero());
    }
}

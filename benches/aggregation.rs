//! Benchmarks for the statistical building blocks
//!
//! Covers the operations on the sampling path (rolling average, latency
//! bucketing, query recording) and the on-demand aggregations over a history
//! window (percentile, histogram, summary).
//!
//! Run with: cargo bench --bench aggregation

use divan::{Bencher, black_box};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use traffic_telemetry::{
    Collector, LatencyBuckets, RollingAverage, SampleInterval, SimulatedSource, StatementType,
    TrafficSnapshot, TrafficStats, histogram, percentile,
};

fn main() {
    divan::main();
}

/// Deterministic latency-like samples in milliseconds
fn samples(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| ((i * 7_919) % 1_000) as f64 / 10.0 + 0.1)
        .collect()
}

// =============================================================================
// Hot path (per query)
// =============================================================================

#[divan::bench]
fn rolling_average_add(bencher: Bencher) {
    let mut avg = RollingAverage::try_new(10).unwrap();
    bencher.bench_local(|| {
        avg.add(black_box(12.5));
        black_box(avg.average())
    });
}

#[divan::bench]
fn latency_buckets_add(bencher: Bencher) {
    let mut buckets = LatencyBuckets::default();
    bencher.bench_local(|| buckets.add(black_box(Duration::from_millis(42))));
}

#[divan::bench(args = ["SELECT", "insert", "VACUUM"])]
fn statement_type_parse(bencher: Bencher, name: &str) {
    bencher.bench(|| black_box(StatementType::parse(black_box(name))));
}

#[divan::bench]
fn statement_type_from_sql(bencher: Bencher) {
    let sql = "WITH recent AS (SELECT id FROM orders WHERE ts > ?) DELETE FROM orders WHERE id IN recent";
    bencher.bench(|| black_box(StatementType::from_sql(black_box(sql))));
}

#[divan::bench]
fn collector_record_query(bencher: Bencher) {
    let collector = Collector::new(
        Arc::new(SimulatedSource::new("sqlite")),
        SampleInterval::DEFAULT,
    );
    bencher.bench(|| {
        collector.record_query(black_box("SELECT"), black_box(Duration::from_micros(800)), None);
    });
}

// =============================================================================
// History aggregation
// =============================================================================

#[divan::bench(args = [60, 600, 3_600])]
fn percentile_p95(bencher: Bencher, len: usize) {
    let values = samples(len);
    bencher.bench(|| black_box(percentile(black_box(&values), 95.0)));
}

#[divan::bench(args = [60, 600, 3_600])]
fn histogram_ten_buckets(bencher: Bencher, len: usize) {
    let values = samples(len);
    bencher.bench(|| black_box(histogram(black_box(&values), 10)));
}

#[divan::bench(args = [60, 600])]
fn traffic_stats_summary(bencher: Bencher, len: usize) {
    let snapshots: Vec<TrafficSnapshot> = samples(len)
        .into_iter()
        .enumerate()
        .map(|(i, ms)| TrafficSnapshot {
            timestamp: SystemTime::UNIX_EPOCH + Duration::from_secs(i as u64),
            queries_per_second: (ms * 3.0).into(),
            average_query_time: Duration::from_secs_f64(ms / 1_000.0),
            total_queries: i as u64 * 100,
            active_connections: i % 8,
            ..TrafficSnapshot::default()
        })
        .collect();
    bencher.bench(|| black_box(TrafficStats::from_snapshots(black_box(&snapshots))));
}

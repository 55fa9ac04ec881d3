//! Configuration type definitions

use crate::types::{
    HistorySize, SampleInterval, SubscriberCapacity, WindowSize, duration_millis,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Sampling settings
    #[serde(default)]
    pub collector: CollectorConfig,
}

/// Collector settings
///
/// Zero intervals, sizes and windows are rejected while parsing, so a
/// deserialized value is always usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Time between samples (default: 1000ms)
    #[serde(rename = "interval_ms")]
    pub interval: SampleInterval,
    /// Snapshots retained in history (default: 60)
    pub history_size: HistorySize,
    /// Query latencies in the rolling average (default: 10)
    pub rolling_window: WindowSize,
    /// Queries slower than this are counted as slow (default: 100ms)
    #[serde(rename = "slow_query_threshold_ms", with = "duration_millis")]
    pub slow_query_threshold: Duration,
    /// Upper bound on a single counter probe (default: 500ms)
    #[serde(rename = "probe_timeout_ms", with = "duration_millis")]
    pub probe_timeout: Duration,
    /// Events buffered per subscriber (default: 10)
    pub subscriber_capacity: SubscriberCapacity,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            interval: super::defaults::interval(),
            history_size: super::defaults::history_size(),
            rolling_window: super::defaults::rolling_window(),
            slow_query_threshold: super::defaults::slow_query_threshold(),
            probe_timeout: super::defaults::probe_timeout(),
            subscriber_capacity: super::defaults::subscriber_capacity(),
        }
    }
}

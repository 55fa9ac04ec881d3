//! Default values for configuration fields

use crate::types::{HistorySize, SampleInterval, SubscriberCapacity, WindowSize};
use std::time::Duration;

/// Default sampling interval (1 second)
#[inline]
pub fn interval() -> SampleInterval {
    SampleInterval::DEFAULT
}

/// Default number of snapshots retained
#[inline]
pub fn history_size() -> HistorySize {
    HistorySize::DEFAULT
}

/// Default rolling-average window for query latency
#[inline]
pub fn rolling_window() -> WindowSize {
    WindowSize::DEFAULT
}

/// Queries slower than this count as slow
#[inline]
pub fn slow_query_threshold() -> Duration {
    Duration::from_millis(100)
}

/// Upper bound on one counter probe
#[inline]
pub fn probe_timeout() -> Duration {
    Duration::from_millis(500)
}

/// Events buffered per subscriber before the oldest are dropped
#[inline]
pub fn subscriber_capacity() -> SubscriberCapacity {
    SubscriberCapacity::DEFAULT
}

//! Statistical building blocks for traffic sampling
//!
//! Small, single-owner structures with no internal synchronization. The
//! collector guards them with its own lock.

mod aggregate;
mod latency;
mod rate;
mod rolling;
mod summary;

pub use aggregate::{Histogram, histogram, percentile};
pub use latency::{LatencyBuckets, LatencyCategory, MEDIUM_BELOW, QUICK_BELOW, SLOW_BELOW};
pub use rate::RateCalculator;
pub use rolling::RollingAverage;
pub use summary::TrafficStats;

//! Fixed-threshold latency categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Upper bound (exclusive) of the quick category
pub const QUICK_BELOW: Duration = Duration::from_millis(10);
/// Upper bound (exclusive) of the medium category
pub const MEDIUM_BELOW: Duration = Duration::from_millis(100);
/// Upper bound (exclusive) of the slow category
pub const SLOW_BELOW: Duration = Duration::from_secs(1);

/// Latency category of a single query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencyCategory {
    /// Under 10ms
    Quick,
    /// 10ms up to 100ms
    Medium,
    /// 100ms up to 1s
    Slow,
    /// 1s or more
    VerySlow,
}

impl LatencyCategory {
    /// All categories in ascending latency order
    pub const ALL: [Self; 4] = [Self::Quick, Self::Medium, Self::Slow, Self::VerySlow];

    /// Place a latency into its category (half-open upper bounds)
    #[must_use]
    pub const fn categorize(latency: Duration) -> Self {
        if latency.as_nanos() < QUICK_BELOW.as_nanos() {
            Self::Quick
        } else if latency.as_nanos() < MEDIUM_BELOW.as_nanos() {
            Self::Medium
        } else if latency.as_nanos() < SLOW_BELOW.as_nanos() {
            Self::Slow
        } else {
            Self::VerySlow
        }
    }

    /// Chart label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Quick => "Quick",
            Self::Medium => "Medium",
            Self::Slow => "Slow",
            Self::VerySlow => "V.Slow",
        }
    }

    #[must_use]
    const fn index(self) -> usize {
        match self {
            Self::Quick => 0,
            Self::Medium => 1,
            Self::Slow => 2,
            Self::VerySlow => 3,
        }
    }
}

impl fmt::Display for LatencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Histogram of query latencies over the four fixed categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LatencyBuckets {
    pub quick: u64,
    pub medium: u64,
    pub slow: u64,
    pub very_slow: u64,
}

impl LatencyBuckets {
    /// Count one latency in exactly one bucket
    pub fn add(&mut self, latency: Duration) {
        match LatencyCategory::categorize(latency) {
            LatencyCategory::Quick => self.quick += 1,
            LatencyCategory::Medium => self.medium += 1,
            LatencyCategory::Slow => self.slow += 1,
            LatencyCategory::VerySlow => self.very_slow += 1,
        }
    }

    /// Count for a single category
    #[must_use]
    pub const fn count(&self, category: LatencyCategory) -> u64 {
        self.to_array()[category.index()]
    }

    /// Counts ordered Quick, Medium, Slow, VerySlow
    #[must_use]
    pub const fn to_array(&self) -> [u64; 4] {
        [self.quick, self.medium, self.slow, self.very_slow]
    }

    /// Labels paired index-for-index with `to_array`
    #[must_use]
    pub const fn labels() -> [&'static str; 4] {
        [
            LatencyCategory::Quick.label(),
            LatencyCategory::Medium.label(),
            LatencyCategory::Slow.label(),
            LatencyCategory::VerySlow.label(),
        ]
    }

    /// Total number of latencies recorded
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.quick + self.medium + self.slow + self.very_slow
    }

    /// (label, count) pairs for bar charts
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        LatencyCategory::ALL
            .into_iter()
            .map(|category| (category.label(), self.count(category)))
    }
}

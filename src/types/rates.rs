//! Per-second rate newtypes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe query rate in queries per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueriesPerSecond(f64);

impl QueriesPerSecond {
    /// Create from raw value
    #[must_use]
    #[inline]
    pub const fn new(qps: f64) -> Self {
        Self(qps)
    }

    /// Zero query rate
    #[must_use]
    #[inline]
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Get raw value
    #[must_use]
    #[inline]
    pub const fn get(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for QueriesPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl From<f64> for QueriesPerSecond {
    fn from(qps: f64) -> Self {
        Self::new(qps)
    }
}

/// Type-safe throughput in bytes per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BytesPerSecond(f64);

impl BytesPerSecond {
    #[must_use]
    #[inline]
    pub const fn new(bps: f64) -> Self {
        Self(bps)
    }

    #[must_use]
    #[inline]
    pub const fn zero() -> Self {
        Self(0.0)
    }

    #[must_use]
    #[inline]
    pub const fn get(&self) -> f64 {
        self.0
    }

    /// Format as human-readable string
    #[must_use]
    pub fn format(&self) -> String {
        if self.0 > 1_000_000.0 {
            format!("{:.2} MB/s", self.0 / 1_000_000.0)
        } else if self.0 > 1_000.0 {
            format!("{:.2} KB/s", self.0 / 1_000.0)
        } else {
            format!("{:.0} B/s", self.0)
        }
    }
}

impl fmt::Display for BytesPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl From<f64> for BytesPerSecond {
    fn from(bps: f64) -> Self {
        Self::new(bps)
    }
}

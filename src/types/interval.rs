//! Sampling interval and millisecond duration serde helpers

use super::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Period between two sampling ticks (never zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleInterval(Duration);

impl SampleInterval {
    /// Default sampling interval (1 second)
    pub const DEFAULT: Self = Self(Duration::from_secs(1));

    /// Create a sampling interval, rejecting a zero duration
    pub const fn new(duration: Duration) -> Result<Self, ValidationError> {
        if duration.is_zero() {
            Err(ValidationError::ZeroInterval)
        } else {
            Ok(Self(duration))
        }
    }

    /// Create a sampling interval from milliseconds
    pub const fn from_millis(millis: u64) -> Result<Self, ValidationError> {
        Self::new(Duration::from_millis(millis))
    }

    #[inline]
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u128 {
        self.0.as_millis()
    }
}

impl Default for SampleInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<Duration> for SampleInterval {
    type Error = ValidationError;

    fn try_from(duration: Duration) -> Result<Self, Self::Error> {
        Self::new(duration)
    }
}

impl From<SampleInterval> for Duration {
    fn from(interval: SampleInterval) -> Self {
        interval.0
    }
}

impl fmt::Display for SampleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0.as_millis())
    }
}

impl Serialize for SampleInterval {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration_millis::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for SampleInterval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let duration = duration_millis::deserialize(deserializer)?;
        Self::new(duration).map_err(serde::de::Error::custom)
    }
}

/// Helper for (de)serializing Duration as whole milliseconds
///
/// Sampling periods and probe timeouts are sub-second, so config files
/// express them in milliseconds rather than seconds.
pub mod duration_millis {
    use super::*;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

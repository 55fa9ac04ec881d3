//! Non-zero sizes for bounded buffers

use std::num::NonZeroUsize;

nonzero_newtype! {
    /// Maximum number of snapshots retained by the traffic history
    pub struct HistorySize(NonZeroUsize: usize, error ZeroHistorySize);
}

impl HistorySize {
    /// Default history size: 60 points = 1 minute at 1 sample/sec
    pub const DEFAULT: Self = Self(NonZeroUsize::new(60).unwrap());
}

impl Default for HistorySize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

nonzero_newtype! {
    /// Number of samples averaged by a rolling window
    pub struct WindowSize(NonZeroUsize: usize, error ZeroWindowSize);
}

impl WindowSize {
    /// Default smoothing window (last 10 queries)
    pub const DEFAULT: Self = Self(NonZeroUsize::new(10).unwrap());
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

nonzero_newtype! {
    /// Number of undelivered events buffered per subscriber
    pub struct SubscriberCapacity(NonZeroUsize: usize, error ZeroSubscriberCapacity);
}

impl SubscriberCapacity {
    pub const DEFAULT: Self = Self(NonZeroUsize::new(10).unwrap());
}

impl Default for SubscriberCapacity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

//! Fixed-window moving average

use crate::types::{ValidationError, WindowSize};

/// Moving average over the last `size` samples
///
/// Samples live in a circular buffer alongside a compensated running sum, so
/// both `add` and `average` are amortised O(1). The sum is rebuilt from the
/// buffer every time the write position wraps, which bounds drift to one
/// window. Until the buffer wraps, the average divides by the number of
/// samples seen rather than the window size.
#[derive(Debug, Clone)]
pub struct RollingAverage {
    values: Box<[f64]>,
    position: usize,
    filled: usize,
    sum: f64,
    compensation: f64,
}

impl RollingAverage {
    /// Create an average over a window of `size` samples
    #[must_use]
    pub fn new(size: WindowSize) -> Self {
        Self {
            values: vec![0.0; size.get()].into_boxed_slice(),
            position: 0,
            filled: 0,
            sum: 0.0,
            compensation: 0.0,
        }
    }

    /// Create from a raw window size, rejecting zero
    pub fn try_new(size: usize) -> Result<Self, ValidationError> {
        WindowSize::try_new(size).map(Self::new)
    }

    /// Record one sample, evicting the oldest once the window is full
    ///
    /// Non-finite samples (NaN, ±inf) are ignored.
    pub fn add(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }

        let evicted = std::mem::replace(&mut self.values[self.position], value);
        self.position = (self.position + 1) % self.values.len();
        if self.filled < self.values.len() {
            self.filled += 1;
        }

        if self.position == 0 {
            self.resum();
        } else {
            self.accumulate(-evicted);
            self.accumulate(value);
        }
    }

    /// Current average, or 0.0 before the first sample
    #[must_use]
    pub fn average(&self) -> f64 {
        if self.filled == 0 {
            0.0
        } else {
            (self.sum + self.compensation) / self.filled as f64
        }
    }

    // Neumaier summation: keep the low-order bits lost by each addition
    fn accumulate(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
    }

    fn resum(&mut self) {
        self.sum = 0.0;
        self.compensation = 0.0;
        for i in 0..self.values.len() {
            let value = self.values[i];
            self.accumulate(value);
        }
    }

    /// Window capacity
    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Number of samples currently contributing to the average
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.filled
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }
}

//! Per-second rate from a cumulative counter

use std::time::Instant;

/// Converts a monotonically increasing counter into a per-second rate
///
/// A counter that goes backwards (reset on reconnect) yields a rate of zero
/// for that interval instead of a negative value.
#[derive(Debug, Clone, Copy)]
pub struct RateCalculator {
    last_value: u64,
    last_time: Instant,
    current_rate: f64,
}

impl RateCalculator {
    /// Start measuring from a zero counter at the current instant
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(0, Instant::now())
    }

    /// Start measuring from a known counter value and instant
    #[must_use]
    pub const fn starting_at(value: u64, now: Instant) -> Self {
        Self {
            last_value: value,
            last_time: now,
            current_rate: 0.0,
        }
    }

    /// Feed the current counter value observed at `now`
    ///
    /// When no time has passed since the previous update (or the clock went
    /// backwards) the previous rate is kept and only the baseline moves.
    pub fn update(&mut self, value: u64, now: Instant) -> f64 {
        let elapsed = now
            .checked_duration_since(self.last_time)
            .map_or(0.0, |d| d.as_secs_f64());

        if elapsed > 0.0 {
            let delta = value.saturating_sub(self.last_value);
            self.current_rate = delta as f64 / elapsed;
        }

        self.last_value = value;
        self.last_time = now;
        self.current_rate
    }

    /// Rate computed by the most recent non-degenerate update
    #[must_use]
    #[inline]
    pub const fn rate(&self) -> f64 {
        self.current_rate
    }
}

impl Default for RateCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_rate_over_two_seconds() {
        let t0 = Instant::now();
        let mut calc = RateCalculator::starting_at(0, t0);
        calc.update(100, t0);
        let rate = calc.update(200, t0 + Duration::from_secs(2));
        assert_eq!(rate, 50.0);
        assert_eq!(calc.rate(), 50.0);
    }

    #[test]
    fn test_counter_reset_never_negative() {
        let t0 = Instant::now();
        let mut calc = RateCalculator::starting_at(500, t0);
        let rate = calc.update(20, t0 + Duration::from_secs(1));
        assert_eq!(rate, 0.0);

        // Baseline moved to the reset value
        let rate = calc.update(30, t0 + Duration::from_secs(2));
        assert_eq!(rate, 10.0);
    }

    #[test]
    fn test_zero_elapsed_keeps_previous_rate() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(1);
        let mut calc = RateCalculator::starting_at(0, t0);
        calc.update(40, t1);
        assert_eq!(calc.update(1_000, t1), 40.0);

        // Baseline was still recorded by the degenerate call
        assert_eq!(calc.update(1_010, t1 + Duration::from_secs(1)), 10.0);
    }

    #[test]
    fn test_clock_going_backwards_keeps_rate() {
        let t0 = Instant::now() + Duration::from_secs(10);
        let mut calc = RateCalculator::starting_at(0, t0);
        calc.update(20, t0 + Duration::from_secs(2));
        assert_eq!(calc.update(50, t0), 10.0);
    }

    #[test]
    fn test_new_starts_at_zero_rate() {
        assert_eq!(RateCalculator::new().rate(), 0.0);
        assert_eq!(RateCalculator::default().rate(), 0.0);
    }
}

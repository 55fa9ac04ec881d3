//! Configuration validation
//!
//! Zero intervals and sizes are already unrepresentable; this checks the
//! remaining constraints between fields.

use anyhow::Result;

use super::types::Config;

impl Config {
    /// Validate configuration for correctness
    ///
    /// - The probe timeout must be non-zero
    /// - A probe timeout not shorter than the interval only warns: ticks that
    ///   overrun are skipped rather than queued
    pub fn validate(&self) -> Result<()> {
        let collector = &self.collector;

        if collector.probe_timeout.is_zero() {
            return Err(anyhow::anyhow!("probe_timeout_ms must be greater than zero"));
        }

        if collector.probe_timeout >= collector.interval.as_duration() {
            tracing::warn!(
                probe_timeout_ms = collector.probe_timeout.as_millis() as u64,
                interval_ms = collector.interval.as_millis() as u64,
                "Probe timeout is not shorter than the sampling interval; slow probes will skip ticks"
            );
        }

        Ok(())
    }
}

//! Scripted counter source
//!
//! Reports counters held in memory, with an optional queue of scripted
//! outcomes (failures, hangs) consumed one per probe. Used by tests and by
//! the `traffic-monitor` demo workload.

use super::{BackendKind, CounterSource, ProbeCounters, ProbeError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

/// Outcome of a single scripted probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Report these counters (they also become the current counters)
    Counters(ProbeCounters),
    /// Fail with this error
    Fail(ProbeError),
    /// Never complete; only the collector's probe timeout ends it
    Hang,
}

#[derive(Debug, Default)]
struct SimulatedState {
    counters: ProbeCounters,
    script: VecDeque<ProbeOutcome>,
    probes: u64,
}

/// In-memory `CounterSource` with scripted outcomes
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    backend_type: String,
    state: Arc<Mutex<SimulatedState>>,
}

impl SimulatedSource {
    /// Create a source reporting zeroed counters
    #[must_use]
    pub fn new(backend_type: impl Into<String>) -> Self {
        Self {
            backend_type: backend_type.into(),
            state: Arc::new(Mutex::new(SimulatedState::default())),
        }
    }

    fn with_state<R>(&self, action: impl FnOnce(&mut SimulatedState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        action(&mut state)
    }

    /// Replace the counters reported by unscripted probes
    pub fn set_counters(&self, counters: ProbeCounters) {
        self.with_state(|s| s.counters = counters);
    }

    /// Mutate the current counters in place (e.g. to simulate traffic)
    pub fn update_counters(&self, update: impl FnOnce(&mut ProbeCounters)) {
        self.with_state(|s| update(&mut s.counters));
    }

    /// Queue an outcome for a future probe
    pub fn push_outcome(&self, outcome: ProbeOutcome) {
        self.with_state(|s| s.script.push_back(outcome));
    }

    /// Queue a failing probe
    pub fn push_failure(&self, error: ProbeError) {
        self.push_outcome(ProbeOutcome::Fail(error));
    }

    /// Number of probes started so far
    #[must_use]
    pub fn probe_count(&self) -> u64 {
        self.with_state(|s| s.probes)
    }

    #[must_use]
    pub fn kind(&self) -> BackendKind {
        BackendKind::from_type(&self.backend_type)
    }
}

#[async_trait]
impl CounterSource for SimulatedSource {
    fn backend_type(&self) -> &str {
        &self.backend_type
    }

    async fn probe(&self) -> Result<ProbeCounters, ProbeError> {
        let outcome = self.with_state(|s| {
            s.probes += 1;
            match s.script.pop_front() {
                Some(ProbeOutcome::Counters(counters)) => {
                    s.counters = counters;
                    ProbeOutcome::Counters(counters)
                }
                Some(other) => other,
                None => ProbeOutcome::Counters(s.counters),
            }
        });

        trace!(
            backend = %self.kind(),
            queries = self.kind().probe_queries().len(),
            "Simulated counter probe"
        );

        match outcome {
            ProbeOutcome::Counters(counters) => Ok(counters),
            ProbeOutcome::Fail(error) => Err(error),
            ProbeOutcome::Hang => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_current_counters() {
        let source = SimulatedSource::new("sqlite");
        source.set_counters(ProbeCounters {
            active_connections: 1,
            total_connections: 3,
            ..ProbeCounters::default()
        });
        source.update_counters(|c| c.bytes_read += 4_096);

        let counters = source.probe().await.unwrap();
        assert_eq!(counters.active_connections, 1);
        assert_eq!(counters.total_connections, 3);
        assert_eq!(counters.bytes_read, 4_096);
        assert_eq!(source.probe_count(), 1);
        assert_eq!(source.backend_type(), "sqlite");
        assert_eq!(source.kind(), BackendKind::Sqlite);
    }

    #[tokio::test]
    async fn test_scripted_outcomes_consumed_in_order() {
        let source = SimulatedSource::new("postgres");
        source.push_failure(ProbeError::Disconnected);
        source.push_outcome(ProbeOutcome::Counters(ProbeCounters {
            bytes_written: 10,
            ..ProbeCounters::default()
        }));

        assert_eq!(source.probe().await, Err(ProbeError::Disconnected));
        assert_eq!(source.probe().await.unwrap().bytes_written, 10);
        // Scripted counters become the current counters
        assert_eq!(source.probe().await.unwrap().bytes_written, 10);
        assert_eq!(source.probe_count(), 3);
    }

    #[tokio::test]
    async fn test_hang_never_completes() {
        let source = SimulatedSource::new("sqlite");
        source.push_outcome(ProbeOutcome::Hang);

        let result =
            tokio::time::timeout(std::time::Duration::from_millis(20), source.probe()).await;
        assert!(result.is_err());
    }
}

//! Periodic traffic sampler

use super::{
    CollectorEvent, QueryMetrics, StatementType, Subscription, TrafficHistory, TrafficSnapshot,
};
use crate::config::CollectorConfig;
use crate::error::CollectorError;
use crate::source::{CounterSource, ProbeCounters, ProbeError};
use crate::stats::{LatencyBuckets, RateCalculator, RollingAverage};
use crate::types::SampleInterval;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

// ============================================================================
// Shared State
// ============================================================================

/// Cumulative query counters, updated by `record_query` and read on each tick
#[derive(Debug)]
struct QueryCounters {
    total: u64,
    select: u64,
    insert: u64,
    update: u64,
    delete: u64,
    slow: u64,
    errors: u64,
    last_error: Option<String>,
    last_error_time: Option<SystemTime>,
    latency_average: RollingAverage,
    latency: LatencyBuckets,
}

impl QueryCounters {
    fn new(config: &CollectorConfig) -> Self {
        Self {
            total: 0,
            select: 0,
            insert: 0,
            update: 0,
            delete: 0,
            slow: 0,
            errors: 0,
            last_error: None,
            last_error_time: None,
            latency_average: RollingAverage::new(config.rolling_window),
            latency: LatencyBuckets::default(),
        }
    }

    fn record(&mut self, kind: StatementType, duration: Duration, slow: bool, error: Option<&str>) {
        self.total += 1;
        match kind {
            StatementType::Select => self.select += 1,
            StatementType::Insert => self.insert += 1,
            StatementType::Update => self.update += 1,
            StatementType::Delete => self.delete += 1,
            StatementType::Other => {}
        }
        if slow {
            self.slow += 1;
        }
        self.latency_average.add(duration.as_secs_f64());
        self.latency.add(duration);

        if let Some(message) = error {
            self.record_error(message.to_string(), SystemTime::now());
        }
    }

    fn record_error(&mut self, message: String, at: SystemTime) {
        self.errors += 1;
        self.last_error = Some(message);
        self.last_error_time = Some(at);
    }

    /// Snapshot of the query counters; connection and rate fields are filled by the sampler
    fn to_snapshot(&self, timestamp: SystemTime, slow_query_threshold: Duration) -> TrafficSnapshot {
        TrafficSnapshot {
            timestamp,
            total_queries: self.total,
            average_query_time: Duration::try_from_secs_f64(self.latency_average.average())
                .unwrap_or_default(),
            select_count: self.select,
            insert_count: self.insert,
            update_count: self.update,
            delete_count: self.delete,
            slow_queries: self.slow,
            slow_query_threshold,
            error_count: self.errors,
            last_error: self.last_error.clone(),
            last_error_time: self.last_error_time,
            latency: self.latency,
            ..TrafficSnapshot::default()
        }
    }
}

/// State shared between the collector handle and its sampling task
#[derive(Debug)]
struct Shared {
    counters: Mutex<QueryCounters>,
    history: Mutex<TrafficHistory>,
    events: broadcast::Sender<CollectorEvent>,
}

impl Shared {
    // A panic while holding either lock leaves plain counters behind, so
    // poisoning is ignored rather than propagated.
    fn counters(&self) -> MutexGuard<'_, QueryCounters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn history(&self) -> MutexGuard<'_, TrafficHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Observable lifecycle state of a collector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    /// Constructed, sampler not started
    Idle,
    /// Sampler task running
    Running,
    /// Terminal; a new collector is needed for a new session
    Stopped,
}

impl fmt::Display for CollectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stopped => "stopped",
        })
    }
}

#[derive(Debug)]
enum Lifecycle {
    Idle,
    Running {
        shutdown_tx: broadcast::Sender<()>,
        handle: JoinHandle<()>,
    },
    Stopped,
}

#[derive(Debug)]
struct CollectorInner {
    source: Arc<dyn CounterSource>,
    config: CollectorConfig,
    shared: Arc<Shared>,
    lifecycle: Mutex<Lifecycle>,
    /// Held by `stop` until the sampler has been joined
    stop_gate: tokio::sync::Mutex<()>,
}

// ============================================================================
// Public API
// ============================================================================

/// Samples traffic counters on a fixed interval and keeps a bounded history
///
/// Cloning is cheap and every clone controls the same collector, so query
/// completions can be recorded from any task. The sampler runs at most once:
/// `Idle -> Running -> Stopped`.
#[derive(Debug, Clone)]
pub struct Collector {
    inner: Arc<CollectorInner>,
}

impl Collector {
    /// Create an idle collector with default settings and the given interval
    #[must_use]
    pub fn new(source: Arc<dyn CounterSource>, interval: SampleInterval) -> Self {
        Self::from_config(
            source,
            CollectorConfig {
                interval,
                ..CollectorConfig::default()
            },
        )
    }

    /// Create an idle collector from a raw interval, rejecting zero
    pub fn try_new(
        source: Arc<dyn CounterSource>,
        interval: Duration,
    ) -> Result<Self, CollectorError> {
        Ok(Self::new(source, SampleInterval::new(interval)?))
    }

    /// Create an idle collector from a full configuration
    #[must_use]
    pub fn from_config(source: Arc<dyn CounterSource>, config: CollectorConfig) -> Self {
        let (events, _) = broadcast::channel(config.subscriber_capacity.get());
        let shared = Arc::new(Shared {
            counters: Mutex::new(QueryCounters::new(&config)),
            history: Mutex::new(TrafficHistory::new(config.history_size)),
            events,
        });

        Self {
            inner: Arc::new(CollectorInner {
                source,
                config,
                shared,
                lifecycle: Mutex::new(Lifecycle::Idle),
                stop_gate: tokio::sync::Mutex::new(()),
            }),
        }
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.inner
            .lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> CollectorState {
        match *self.lifecycle() {
            Lifecycle::Idle => CollectorState::Idle,
            Lifecycle::Running { .. } => CollectorState::Running,
            Lifecycle::Stopped => CollectorState::Stopped,
        }
    }

    #[must_use]
    pub fn config(&self) -> &CollectorConfig {
        &self.inner.config
    }

    /// Spawn the sampling task on the current Tokio runtime
    ///
    /// Fails with `AlreadyRunning` or `Stopped` instead of spawning a second
    /// sampler, and with `NoRuntime` outside of a runtime.
    pub fn start(&self) -> Result<(), CollectorError> {
        let mut lifecycle = self.lifecycle();
        match *lifecycle {
            Lifecycle::Idle => {}
            Lifecycle::Running { .. } => return Err(CollectorError::AlreadyRunning),
            Lifecycle::Stopped => return Err(CollectorError::Stopped),
        }

        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| CollectorError::NoRuntime)?;

        let config = &self.inner.config;
        let baseline = self.inner.shared.counters().total;
        let sampler = Sampler {
            source: Arc::clone(&self.inner.source),
            shared: Arc::clone(&self.inner.shared),
            probe_timeout: config.probe_timeout,
            slow_query_threshold: config.slow_query_threshold,
            rate: RateCalculator::starting_at(baseline, Instant::now()),
            last_probe: ProbeCounters::default(),
        };

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = runtime.spawn(sampler.run(config.interval, shutdown_rx));
        *lifecycle = Lifecycle::Running {
            shutdown_tx,
            handle,
        };

        info!(
            backend = self.inner.source.backend_type(),
            interval_ms = config.interval.as_millis() as u64,
            history_size = config.history_size.get(),
            "Started traffic collector"
        );
        Ok(())
    }

    /// Stop sampling and wait for the sampling task to finish
    ///
    /// After this returns no further snapshot is produced. Calling it again,
    /// concurrently, or before `start` is safe; an idle collector becomes
    /// stopped without ever sampling.
    pub async fn stop(&self) {
        let _gate = self.inner.stop_gate.lock().await;

        let previous = std::mem::replace(&mut *self.lifecycle(), Lifecycle::Stopped);
        match previous {
            Lifecycle::Running {
                shutdown_tx,
                handle,
            } => {
                let _ = shutdown_tx.send(());
                if let Err(e) = handle.await {
                    warn!(error = %e, "Traffic sampler task ended abnormally");
                }
                info!(
                    backend = self.inner.source.backend_type(),
                    "Stopped traffic collector"
                );
            }
            Lifecycle::Idle => debug!("Traffic collector stopped before it was started"),
            Lifecycle::Stopped => {}
        }
    }

    /// Fold one completed query into the cumulative counters
    ///
    /// `statement_type` is matched case-insensitively against SELECT, INSERT,
    /// UPDATE and DELETE; anything else only counts toward the total. A query
    /// that failed passes its error message.
    pub fn record_query(&self, statement_type: &str, duration: Duration, error: Option<&str>) {
        self.record_statement(StatementType::parse(statement_type), duration, error);
    }

    /// Fold a full query record into the cumulative counters
    pub fn record(&self, query: &QueryMetrics) {
        self.record_statement(query.statement_type(), query.duration, query.error.as_deref());
    }

    fn record_statement(&self, kind: StatementType, duration: Duration, error: Option<&str>) {
        let slow = duration > self.inner.config.slow_query_threshold;
        self.inner
            .shared
            .counters()
            .record(kind, duration, slow, error);
    }

    /// Most recent snapshot, or the zero value before the first tick
    #[must_use]
    pub fn metrics(&self) -> TrafficSnapshot {
        self.inner
            .shared
            .history()
            .latest()
            .cloned()
            .unwrap_or_default()
    }

    /// Up to `n` most recent snapshots, oldest first
    #[must_use]
    pub fn history(&self, n: usize) -> Vec<TrafficSnapshot> {
        self.inner.shared.history().last(n)
    }

    /// Chart points for the `n` most recent snapshots
    pub fn history_series<F>(&self, n: usize, value: F) -> Vec<(f64, f64)>
    where
        F: Fn(&TrafficSnapshot) -> f64,
    {
        self.inner.shared.history().series(n, value)
    }

    /// Subscribe to snapshot and collection-error events
    ///
    /// Only events published after subscribing are delivered.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription::new(self.inner.shared.events.subscribe())
    }
}

// ============================================================================
// Sampling Task
// ============================================================================

/// State owned by the background sampling task
struct Sampler {
    source: Arc<dyn CounterSource>,
    shared: Arc<Shared>,
    probe_timeout: Duration,
    slow_query_threshold: Duration,
    rate: RateCalculator,
    /// Counters from the last successful probe, reused when a probe fails
    last_probe: ProbeCounters,
}

impl Sampler {
    async fn run(mut self, interval: SampleInterval, mut shutdown_rx: broadcast::Receiver<()>) {
        let period = interval.as_duration();
        let mut ticker = time::interval_at(time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // A closed channel (collector dropped) also ends the loop
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                _ = ticker.tick() => {}
            }

            let probe = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                result = time::timeout(self.probe_timeout, self.source.probe()) => {
                    result.unwrap_or(Err(ProbeError::Timeout(self.probe_timeout)))
                }
            };

            self.tick(probe);
        }

        debug!(
            backend = self.source.backend_type(),
            "Traffic sampler loop exited"
        );
    }

    /// Build, store and publish one snapshot
    fn tick(&mut self, probe: Result<ProbeCounters, ProbeError>) {
        let timestamp = SystemTime::now();

        let failure = match probe {
            Ok(counters) => {
                self.last_probe = counters;
                None
            }
            Err(e) => {
                warn!(
                    backend = self.source.backend_type(),
                    error = %e,
                    "Failed to gather traffic counters"
                );
                Some(e.to_string())
            }
        };

        let snapshot = {
            let mut counters = self.shared.counters();
            if let Some(message) = &failure {
                counters.record_error(message.clone(), timestamp);
            }
            counters.to_snapshot(timestamp, self.slow_query_threshold)
        };

        let qps = self.rate.update(snapshot.total_queries, Instant::now());
        let snapshot = TrafficSnapshot {
            queries_per_second: qps.into(),
            active_connections: self.last_probe.active_connections,
            total_connections: self.last_probe.total_connections,
            bytes_read: self.last_probe.bytes_read,
            bytes_written: self.last_probe.bytes_written,
            ..snapshot
        };

        debug!(
            total_queries = snapshot.total_queries,
            qps = snapshot.queries_per_second.get(),
            errors = snapshot.error_count,
            "Traffic sample"
        );

        self.shared.history().push(snapshot.clone());

        // No subscribers is not an error
        if let Some(message) = failure {
            let _ = self.shared.events.send(CollectorEvent::CollectionError {
                message,
                at: timestamp,
            });
        }
        let _ = self.shared.events.send(CollectorEvent::Snapshot(snapshot));
    }
}

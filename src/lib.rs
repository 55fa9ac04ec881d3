//! Live traffic telemetry for data-store connections
//!
//! A [`Collector`] samples activity counters from a [`CounterSource`] on a
//! fixed interval while the application reports each completed query through
//! [`Collector::record_query`]. Every tick produces an immutable
//! [`TrafficSnapshot`] that is kept in a bounded history and pushed to
//! subscribers.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use traffic_telemetry::{Collector, SampleInterval, SimulatedSource};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let source = Arc::new(SimulatedSource::new("sqlite"));
//! let collector = Collector::new(source, SampleInterval::from_millis(500)?);
//! collector.start()?;
//!
//! collector.record_query("SELECT", Duration::from_millis(3), None);
//!
//! let mut events = collector.subscribe();
//! if let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! collector.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod config;
pub mod error;
pub mod formatting;
pub mod logging;
pub mod metrics;
pub mod source;
pub mod stats;
pub mod types;

pub use config::{CollectorConfig, Config, ConfigSource, load_config, load_config_with_fallback};
pub use error::CollectorError;
pub use metrics::{
    Collector, CollectorEvent, CollectorState, QueryMetrics, StatementType, Subscription,
    TrafficHistory, TrafficSnapshot,
};
pub use source::{BackendKind, CounterSource, ProbeCounters, ProbeError, SimulatedSource};
pub use stats::{
    Histogram, LatencyBuckets, LatencyCategory, RateCalculator, RollingAverage, TrafficStats,
    histogram, percentile,
};
pub use types::{
    HistorySize, QueriesPerSecond, SampleInterval, SubscriberCapacity, ValidationError, WindowSize,
};

//! Live traffic metrics
//!
//! A [`Collector`] samples counters from a [`CounterSource`](crate::source::CounterSource)
//! on a fixed interval, folds in query completions reported through
//! [`Collector::record_query`], and keeps a bounded [`TrafficHistory`] of
//! [`TrafficSnapshot`]s. Subscribers receive each snapshot as a
//! [`CollectorEvent`].

mod collector;
mod events;
mod history;
mod query;
mod snapshot;

pub use collector::{Collector, CollectorState};
pub use events::{CollectorEvent, Subscription};
pub use history::TrafficHistory;
pub use query::{QueryMetrics, StatementType};
pub use snapshot::TrafficSnapshot;

//! Counter source abstraction
//!
//! The collector does not talk to a data store directly. An adaptor for the
//! active connection implements `CounterSource`, running whatever diagnostic
//! queries its backend supports and reporting the resulting counters. This
//! enables:
//! - Swapping backends without touching the sampling loop
//! - Testing the collector without a live database

mod simulated;

pub use simulated::{ProbeOutcome, SimulatedSource};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Counters reported by one probe of the data store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProbeCounters {
    pub active_connections: usize,
    pub total_connections: u64,
    /// Cumulative bytes read from the data store
    pub bytes_read: u64,
    /// Cumulative bytes written to the data store
    pub bytes_written: u64,
}

/// Errors a probe can report
///
/// All of these are transient from the collector's point of view: they are
/// recorded into the next snapshot and sampling continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProbeError {
    /// The probe did not complete within the allowed time
    #[error("counter probe timed out after {0:?}")]
    Timeout(Duration),

    /// A diagnostic query failed
    #[error("counter query failed: {0}")]
    Query(String),

    /// The underlying connection is gone
    #[error("data store connection is closed")]
    Disconnected,
}

/// Capability to sample activity counters from an active data-store connection
///
/// Implementations should bound their own queries with a short timeout; the
/// collector additionally wraps every probe in its configured probe timeout.
#[async_trait]
pub trait CounterSource: Send + Sync + fmt::Debug {
    /// Backend type identifier, e.g. "sqlite" or "postgres"
    fn backend_type(&self) -> &str;

    /// Run the backend's diagnostic queries and report the current counters
    async fn probe(&self) -> Result<ProbeCounters, ProbeError>;
}

/// Data-store backends with known diagnostic queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Sqlite,
    Postgres,
    Other,
}

impl BackendKind {
    /// Classify a `CounterSource::backend_type` identifier
    #[must_use]
    pub fn from_type(backend_type: &str) -> Self {
        match backend_type.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Self::Sqlite,
            "postgres" | "postgresql" | "pg" => Self::Postgres,
            _ => Self::Other,
        }
    }

    /// Diagnostic queries an adaptor for this backend is expected to run
    #[must_use]
    pub const fn probe_queries(&self) -> &'static [&'static str] {
        match self {
            Self::Sqlite => &[
                "PRAGMA page_count",
                "PRAGMA cache_size",
                "SELECT COUNT(*) FROM sqlite_master",
            ],
            Self::Postgres => &[
                "SELECT state, COUNT(*) FROM pg_stat_activity GROUP BY state",
                "SELECT numbackends, xact_commit, xact_rollback, tup_returned, tup_inserted, \
                 tup_updated, tup_deleted, blks_read, blks_hit \
                 FROM pg_stat_database WHERE datname = current_database()",
            ],
            Self::Other => &[],
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

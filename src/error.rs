//! Collector lifecycle errors
//!
//! Sampling failures never surface here: they are recorded into snapshots.
//! These errors cover configuration and misuse, reported synchronously.

use crate::types::ValidationError;
use thiserror::Error;

/// Errors returned by `Collector` construction and lifecycle calls
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CollectorError {
    /// A size or interval failed validation
    #[error("invalid collector configuration: {0}")]
    Invalid(#[from] ValidationError),

    /// `start` was called while the sampler is already running
    #[error("collector is already running")]
    AlreadyRunning,

    /// The collector was stopped; create a new one for a new session
    #[error("collector has been stopped and cannot be restarted")]
    Stopped,

    /// `start` was called outside of a Tokio runtime
    #[error("no Tokio runtime available to spawn the sampler")]
    NoRuntime,
}

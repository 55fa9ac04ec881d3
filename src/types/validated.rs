//! Validation errors for constructor-checked values

use thiserror::Error;

/// Errors raised when a size or interval violates its invariant
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("sampling interval must be greater than zero")]
    ZeroInterval,

    #[error("history size must be greater than zero")]
    ZeroHistorySize,

    #[error("rolling window size must be greater than zero")]
    ZeroWindowSize,

    #[error("subscriber capacity must be greater than zero")]
    ZeroSubscriberCapacity,
}

//! Configuration module
//!
//! Collector settings loaded from TOML with environment overrides.

mod defaults;
mod loading;
mod types;
mod validation;

pub use loading::{
    ConfigSource, ENV_HISTORY_SIZE, ENV_INTERVAL_MS, ENV_PROBE_TIMEOUT_MS, ENV_ROLLING_WINDOW,
    ENV_SLOW_QUERY_MS, apply_env_overrides, apply_env_overrides_from, load_config,
    load_config_with_fallback,
};
pub use types::{CollectorConfig, Config};

// Re-export default functions for use in tests and other modules
pub use defaults::{
    history_size, interval, probe_timeout, rolling_window, slow_query_threshold,
    subscriber_capacity,
};

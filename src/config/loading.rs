//! Configuration loading from files and environment variables
//!
//! Environment variables take precedence over the config file so a deployed
//! monitor can be retuned without editing it.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

use super::types::Config;
use crate::types::{HistorySize, SampleInterval, WindowSize};

/// Sampling interval in milliseconds
pub const ENV_INTERVAL_MS: &str = "TRAFFIC_INTERVAL_MS";
/// Number of snapshots retained
pub const ENV_HISTORY_SIZE: &str = "TRAFFIC_HISTORY_SIZE";
/// Rolling-average window for query latency
pub const ENV_ROLLING_WINDOW: &str = "TRAFFIC_ROLLING_WINDOW";
/// Slow query threshold in milliseconds
pub const ENV_SLOW_QUERY_MS: &str = "TRAFFIC_SLOW_QUERY_MS";
/// Probe timeout in milliseconds
pub const ENV_PROBE_TIMEOUT_MS: &str = "TRAFFIC_PROBE_TIMEOUT_MS";

/// Where the effective configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from the config file (possibly with environment overrides)
    File,
    /// No config file; built-in defaults with environment overrides
    Environment,
    /// No config file and no overrides
    Defaults,
}

impl ConfigSource {
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::File => "configuration file",
            Self::Environment => "environment variables",
            Self::Defaults => "built-in defaults",
        }
    }
}

fn parse_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value '{}' for {}", raw, key))
        })
        .transpose()
}

/// Apply `TRAFFIC_*` overrides found through `lookup`
///
/// Returns whether any override was applied. Zero intervals, sizes and
/// windows are rejected the same way the config file rejects them.
pub fn apply_env_overrides_from(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<bool> {
    let collector = &mut config.collector;
    let mut applied = false;

    if let Some(ms) = parse_env::<u64>(&lookup, ENV_INTERVAL_MS)? {
        collector.interval = SampleInterval::from_millis(ms)
            .with_context(|| format!("Invalid value for {}", ENV_INTERVAL_MS))?;
        applied = true;
    }
    if let Some(size) = parse_env::<usize>(&lookup, ENV_HISTORY_SIZE)? {
        collector.history_size = HistorySize::try_new(size)
            .with_context(|| format!("Invalid value for {}", ENV_HISTORY_SIZE))?;
        applied = true;
    }
    if let Some(size) = parse_env::<usize>(&lookup, ENV_ROLLING_WINDOW)? {
        collector.rolling_window = WindowSize::try_new(size)
            .with_context(|| format!("Invalid value for {}", ENV_ROLLING_WINDOW))?;
        applied = true;
    }
    if let Some(ms) = parse_env::<u64>(&lookup, ENV_SLOW_QUERY_MS)? {
        collector.slow_query_threshold = Duration::from_millis(ms);
        applied = true;
    }
    if let Some(ms) = parse_env::<u64>(&lookup, ENV_PROBE_TIMEOUT_MS)? {
        collector.probe_timeout = Duration::from_millis(ms);
        applied = true;
    }

    Ok(applied)
}

/// Apply `TRAFFIC_*` overrides from the process environment
pub fn apply_env_overrides(config: &mut Config) -> Result<bool> {
    apply_env_overrides_from(config, |key| std::env::var(key).ok())
}

/// Load configuration from a TOML file, with environment variable overrides
pub fn load_config(config_path: &str) -> Result<Config> {
    let config_content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file '{}'", config_path))?;

    let mut config: Config = toml::from_str(&config_content)
        .with_context(|| format!("Failed to parse config file '{}'", config_path))?;

    if apply_env_overrides(&mut config)? {
        tracing::info!("Applied collector overrides from environment variables");
    }

    config.validate()?;

    Ok(config)
}

/// Load configuration, falling back to defaults when the file does not exist
///
/// A file that exists but fails to parse is still an error.
pub fn load_config_with_fallback(config_path: &str) -> Result<(Config, ConfigSource)> {
    if Path::new(config_path).exists() {
        return Ok((load_config(config_path)?, ConfigSource::File));
    }

    tracing::warn!(
        path = config_path,
        "Config file not found, using built-in defaults"
    );

    let mut config = Config::default();
    let source = if apply_env_overrides(&mut config)? {
        ConfigSource::Environment
    } else {
        ConfigSource::Defaults
    };

    config.validate()?;

    Ok((config, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = Config::default();
        let applied = apply_env_overrides_from(
            &mut config,
            lookup(&[
                (ENV_INTERVAL_MS, "250"),
                (ENV_HISTORY_SIZE, "120"),
                (ENV_ROLLING_WINDOW, "5"),
                (ENV_SLOW_QUERY_MS, "40"),
                (ENV_PROBE_TIMEOUT_MS, " 100 "),
            ]),
        )
        .unwrap();

        assert!(applied);
        let c = config.collector;
        assert_eq!(c.interval.as_millis(), 250);
        assert_eq!(c.history_size.get(), 120);
        assert_eq!(c.rolling_window.get(), 5);
        assert_eq!(c.slow_query_threshold, Duration::from_millis(40));
        assert_eq!(c.probe_timeout, Duration::from_millis(100));
    }

    #[test]
    fn test_no_overrides() {
        let mut config = Config::default();
        assert!(!apply_env_overrides_from(&mut config, lookup(&[])).unwrap());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut config = Config::default();
        let err = apply_env_overrides_from(&mut config, lookup(&[(ENV_INTERVAL_MS, "fast")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_INTERVAL_MS));

        assert!(
            apply_env_overrides_from(&mut config, lookup(&[(ENV_HISTORY_SIZE, "0")])).is_err()
        );
    }

    #[test]
    fn test_config_source_descriptions() {
        assert_eq!(ConfigSource::File.description(), "configuration file");
        assert_eq!(ConfigSource::Defaults.description(), "built-in defaults");
    }
}

//! Command-line arguments for the traffic monitor

use crate::types::SampleInterval;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parse a sampling interval in milliseconds
fn parse_interval(s: &str) -> Result<SampleInterval, String> {
    let millis: u64 = s
        .parse()
        .map_err(|e| format!("Invalid interval: {}", e))?;
    SampleInterval::from_millis(millis).map_err(|e| e.to_string())
}

/// Live traffic monitor over a simulated data-store workload
#[derive(Parser, Debug, Clone)]
#[command(name = "traffic-monitor", author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path (defaults are used when it does not exist)
    #[arg(short, long, default_value = "traffic-monitor.toml", env = "TRAFFIC_CONFIG")]
    pub config: String,

    /// Backend type reported by the simulated source (sqlite, postgres, ...)
    #[arg(short, long, default_value = "sqlite", env = "TRAFFIC_BACKEND")]
    pub backend: String,

    /// Sampling interval in milliseconds (overrides config file)
    #[arg(short, long, value_parser = parse_interval)]
    pub interval_ms: Option<SampleInterval>,

    /// Print each snapshot as a JSON line instead of text
    #[arg(long)]
    pub json: bool,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(short, long)]
    pub duration_secs: Option<u64>,

    /// Average synthetic queries per second
    #[arg(long, default_value_t = 50)]
    pub workload_qps: u32,

    /// Also write logs to this file
    #[arg(long, env = "TRAFFIC_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Run time limit, if any
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration_secs.map(Duration::from_secs)
    }
}

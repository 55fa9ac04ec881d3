use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

use traffic_telemetry::args::Args;
use traffic_telemetry::logging::{LogTarget, init_logging};
use traffic_telemetry::{
    Collector, CollectorEvent, ProbeCounters, SimulatedSource, TrafficStats,
    load_config_with_fallback,
};

const STATEMENTS: [&str; 5] = ["SELECT", "SELECT", "INSERT", "UPDATE", "DELETE"];

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let target = if args.json {
        LogTarget::Stderr
    } else {
        LogTarget::Stdout
    };
    let _log_guard = init_logging(target, args.log_file.as_deref());

    let (mut config, source) = load_config_with_fallback(&args.config)?;
    if let Some(interval) = args.interval_ms {
        config.collector.interval = interval;
        config.validate()?;
    }
    info!(
        source = source.description(),
        interval = %config.collector.interval,
        history_size = config.collector.history_size.get(),
        "Loaded configuration"
    );

    let counters = SimulatedSource::new(args.backend.clone());
    counters.set_counters(ProbeCounters {
        active_connections: 1,
        total_connections: 1,
        ..ProbeCounters::default()
    });

    let collector = Collector::from_config(Arc::new(counters.clone()), config.collector);
    let mut events = collector.subscribe();
    collector.start()?;

    let workload = tokio::spawn(run_workload(
        collector.clone(),
        counters,
        args.workload_qps.max(1),
    ));

    let deadline = async {
        match args.duration() {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
            _ = &mut deadline => break,
            event = events.recv() => match event {
                Some(CollectorEvent::Snapshot(snapshot)) => {
                    if args.json {
                        println!("{}", serde_json::to_string(&snapshot)?);
                    } else {
                        println!("{snapshot}");
                    }
                }
                Some(CollectorEvent::CollectionError { message, .. }) => {
                    warn!(error = %message, "Collection error");
                }
                None => break,
            },
        }
    }

    workload.abort();
    collector.stop().await;

    let stats = TrafficStats::from_snapshots(&collector.history(usize::MAX));
    if args.json {
        println!("{}", serde_json::to_string(&stats)?);
    } else {
        info!(
            period_secs = stats.period.as_secs_f64(),
            total_queries = stats.total_queries,
            average_qps = stats.average_qps,
            peak_qps = stats.peak_qps,
            p95_latency_ms = stats.p95_latency.as_secs_f64() * 1_000.0,
            error_rate = stats.error_rate,
            dropped_events = events.dropped(),
            "Traffic summary"
        );
    }

    Ok(())
}

/// Drive a synthetic query mix against the collector and source counters
async fn run_workload(collector: Collector, counters: SimulatedSource, qps: u32) {
    let mut rng = StdRng::from_os_rng();
    let mean_gap = 1.0 / f64::from(qps);

    loop {
        let gap = rng.random_range(0.0..2.0 * mean_gap);
        tokio::time::sleep(Duration::from_secs_f64(gap)).await;

        let statement = STATEMENTS[rng.random_range(0..STATEMENTS.len())];
        // Mostly quick queries with a long tail
        let latency_ms = if rng.random_bool(0.05) {
            rng.random_range(100.0..1_500.0)
        } else {
            rng.random_range(0.2..40.0)
        };
        let error = rng.random_bool(0.01).then_some("database is locked");

        collector.record_query(statement, Duration::from_secs_f64(latency_ms / 1_000.0), error);

        let read = rng.random_range(64..8_192);
        let written = if statement == "SELECT" { 0 } else { rng.random_range(32..1_024) };
        counters.update_counters(|c| {
            c.bytes_read += read;
            c.bytes_written += written;
            if rng.random_bool(0.02) {
                c.total_connections += 1;
                c.active_connections = (c.active_connections % 4) + 1;
            }
        });
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

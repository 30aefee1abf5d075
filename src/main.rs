//! Sigstore prober.
//!
//! Periodically probes the read (and optionally write) endpoints of Rekor and
//! Fulcio and exposes the observed latencies for Prometheus.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌────────────────────────────── probe task ──────────────────────────────┐
//!   │  scheduler ──▶ executor ──HTTP──▶ Rekor / Fulcio                        │
//!   │      │             │                                                   │
//!   │      │             ▼                                                   │
//!   │      │         recorder ──▶ LatencyMetrics (summary + histogram)        │
//!   │      ▼                               ▲                                 │
//!   │  write probe (Fulcio signingCert)    │                                 │
//!   └──────────────────────────────────────┼─────────────────────────────────┘
//!                                          │ render
//!   ┌──────────────── main task ───────────┴──┐
//!   │  axum: GET /metrics, GET /healthz      │ ◀── Prometheus scrape
//!   └────────────────────────────────────────┘
//! ```
//!
//! # Exit codes
//! - `0`: clean shutdown, or a single pass (`--one-time`) without failures
//! - `1`: a single pass with at least one failure
//! - `2`: startup failure (configuration, bind)

use clap::Parser;
use std::process::ExitCode;
use tokio::net::TcpListener;

use sigstore_prober::config::{Cli, ProberConfig};
use sigstore_prober::lifecycle::{signals, startup, Shutdown};
use sigstore_prober::observability::logging::init_logging;
use sigstore_prober::probe::scheduler::{EXIT_FAILURE, EXIT_SUCCESS};
use sigstore_prober::{MetricsServer, RunOutcome};

const EXIT_STARTUP: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sigstore-prober: {}", e);
            return ExitCode::from(EXIT_STARTUP);
        }
    };

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("sigstore-prober: failed to initialize logging: {}", e);
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sigstore-prober starting");

    match run(config).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::from(EXIT_STARTUP)
        }
    }
}

async fn run(config: ProberConfig) -> Result<u8, Box<dyn std::error::Error>> {
    let metrics = startup::build_metrics(&config)?;
    let prober = startup::build_prober(&config, metrics.clone());

    let addr = config.observability.metrics_bind_address();
    let listener = TcpListener::bind(addr.as_str()).await?;

    let shutdown = Shutdown::new();
    let mut server_task = tokio::spawn(MetricsServer::new(metrics).run(listener, shutdown.subscribe()));
    let mut probe_task = tokio::spawn(prober.run(shutdown.subscribe()));
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let outcome = tokio::select! {
        joined = &mut probe_task => {
            let outcome = joined?;
            let notified = shutdown.trigger();
            tracing::debug!(tasks = notified, "Probe task finished, stopping metrics server");
            server_task.await??;
            outcome
        }
        joined = &mut server_task => {
            let notified = shutdown.trigger();
            tracing::warn!(tasks = notified, "Metrics server stopped, cancelling probes");
            let served = joined?;
            let outcome = probe_task.await?;
            served?;
            outcome
        }
    };

    let code = match outcome {
        RunOutcome::Completed(report) => report.exit_code(),
        RunOutcome::Cancelled if config.prober.one_time => EXIT_FAILURE,
        RunOutcome::Cancelled => EXIT_SUCCESS,
    };
    tracing::info!(exit_code = code, "Shutdown complete");
    Ok(code)
}

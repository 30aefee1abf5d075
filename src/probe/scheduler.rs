//! Probe scheduler.
//!
//! # Responsibilities
//! - Run passes over both catalogs, then the write probe
//! - Fold every failure into the pass outcome without aborting the pass
//! - Sleep between passes, or stop after one pass in single-pass mode
//!
//! # States
//! ```text
//! Idle → RunningPass → (Sleeping → RunningPass)* → Terminated
//! ```
//! `Terminated` is only reached in single-pass mode or on shutdown.
//!
//! # Design Decisions
//! - Probes run strictly sequentially; no fan-out within a pass
//! - No retries: a failed probe is a failed observation
//! - Shutdown is observed at both suspension points (in-flight request and
//!   the inter-pass sleep)

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;
use tracing::Instrument;

use crate::config::ProberConfig;
use crate::probe::catalog::{ProbeCatalog, Target};
use crate::probe::executor::{ObservationOutcome, RequestExecutor};
use crate::probe::recorder::ObservationRecorder;
use crate::signing::WriteProbe;

/// Exit code for a single pass without failures.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit code for a single pass with at least one failure.
pub const EXIT_FAILURE: u8 = 1;

/// Scheduler settings derived from configuration.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub rekor_url: String,
    pub fulcio_url: String,
    pub interval: Duration,
    pub one_time: bool,
    pub fail_on_server_error: bool,
}

impl ProbeSettings {
    pub fn host(&self, target: Target) -> &str {
        match target {
            Target::Rekor => &self.rekor_url,
            Target::Fulcio => &self.fulcio_url,
        }
    }
}

impl From<&ProberConfig> for ProbeSettings {
    fn from(config: &ProberConfig) -> Self {
        Self {
            rekor_url: config.targets.rekor_url.clone(),
            fulcio_url: config.targets.fulcio_url.clone(),
            interval: config.prober.interval(),
            one_time: config.prober.one_time,
            fail_on_server_error: config.prober.fail_on_server_error,
        }
    }
}

/// Pass-scoped failure state. A fresh report is created for every pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Latency observations recorded (read probes only).
    pub observations: usize,
    pub transport_failures: usize,
    pub server_errors: usize,
    pub write_probe_failed: bool,
    failed: bool,
}

impl PassReport {
    fn observe(&mut self, outcome: &ObservationOutcome, fail_on_server_error: bool) {
        self.observations += 1;
        if outcome.is_transport_failure() {
            self.transport_failures += 1;
            self.failed = true;
        } else if outcome.is_server_error() {
            self.server_errors += 1;
            if fail_on_server_error {
                self.failed = true;
            }
        }
    }

    fn write_probe_failure(&mut self) {
        self.write_probe_failed = true;
        self.failed = true;
    }

    /// Whether any failure counted toward this pass's exit status.
    pub fn had_error(&self) -> bool {
        self.failed
    }

    pub fn exit_code(&self) -> u8 {
        if self.failed {
            EXIT_FAILURE
        } else {
            EXIT_SUCCESS
        }
    }
}

/// How the probe loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Single-pass mode finished its pass.
    Completed(PassReport),
    /// Shutdown was signalled.
    Cancelled,
}

/// Drives probe passes.
pub struct Prober {
    catalog: ProbeCatalog,
    settings: ProbeSettings,
    executor: RequestExecutor,
    recorder: ObservationRecorder,
    write_probe: Option<Arc<dyn WriteProbe>>,
}

impl Prober {
    pub fn new(
        catalog: ProbeCatalog,
        settings: ProbeSettings,
        executor: RequestExecutor,
        recorder: ObservationRecorder,
    ) -> Self {
        Self {
            catalog,
            settings,
            executor,
            recorder,
            write_probe: None,
        }
    }

    pub fn with_write_probe(mut self, write_probe: Arc<dyn WriteProbe>) -> Self {
        self.write_probe = Some(write_probe);
        self
    }

    /// Run until the single pass finishes or shutdown is signalled.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> RunOutcome {
        tracing::info!(
            interval_secs = self.settings.interval.as_secs(),
            one_time = self.settings.one_time,
            rekor = %self.settings.rekor_url,
            fulcio = %self.settings.fulcio_url,
            read_probes = self.catalog.len(),
            write_probe = self.write_probe.is_some(),
            "Prober starting"
        );

        let mut pass: u64 = 0;
        loop {
            pass += 1;
            let span = tracing::info_span!("pass", number = pass);

            let report = tokio::select! {
                report = self.run_pass().instrument(span) => report,
                _ = shutdown.recv() => {
                    tracing::info!("Prober received shutdown signal during pass, exiting loop");
                    return RunOutcome::Cancelled;
                }
            };

            if self.settings.one_time {
                return RunOutcome::Completed(report);
            }

            tokio::select! {
                _ = time::sleep(self.settings.interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Prober received shutdown signal, exiting loop");
                    return RunOutcome::Cancelled;
                }
            }
        }
    }

    /// Execute one full pass: Rekor probes, Fulcio probes, then the write probe.
    pub async fn run_pass(&self) -> PassReport {
        let mut report = PassReport::default();

        for target in [Target::Rekor, Target::Fulcio] {
            let host = self.settings.host(target);
            for probe in self.catalog.probes(target) {
                let outcome = self.executor.execute(host, probe).await;
                self.recorder.record(host, probe, &outcome);
                report.observe(&outcome, self.settings.fail_on_server_error);

                match (&outcome.error, outcome.status_code) {
                    (Some(e), _) => tracing::warn!(
                        target_service = %target,
                        host = %host,
                        endpoint = %probe.endpoint_path,
                        latency_ms = outcome.latency_millis,
                        timeout = e.is_timeout(),
                        error = %e,
                        "Error running request"
                    ),
                    (None, Some(status)) if outcome.is_server_error() => tracing::warn!(
                        target_service = %target,
                        host = %host,
                        endpoint = %probe.endpoint_path,
                        status,
                        latency_ms = outcome.latency_millis,
                        "Endpoint returned server error"
                    ),
                    (None, status) => tracing::info!(
                        target_service = %target,
                        host = %host,
                        endpoint = %probe.endpoint_path,
                        status = ?status,
                        latency_ms = outcome.latency_millis,
                        "Observed endpoint"
                    ),
                }
            }
        }

        if let Some(write_probe) = &self.write_probe {
            if let Err(e) = write_probe.run().await {
                tracing::error!(probe = write_probe.name(), error = %e, "Error running write prober");
                report.write_probe_failure();
            }
        }

        tracing::info!(
            observations = report.observations,
            transport_failures = report.transport_failures,
            server_errors = report.server_errors,
            write_probe_failed = report.write_probe_failed,
            failed = report.had_error(),
            "Probe pass complete"
        );
        report
    }
}

//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the latency aggregations from configuration
//! - Wire executor, recorder and write probe into a [`Prober`]
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The aggregations are created once and shared by the prober and the
//!   metrics server

use std::sync::Arc;

use crate::config::ProberConfig;
use crate::observability::metrics::{LatencyMetrics, MetricsError};
use crate::probe::{ObservationRecorder, ProbeCatalog, ProbeSettings, Prober, RequestExecutor};
use crate::signing::FulcioWriteProbe;

/// Create the process-lifetime latency aggregations.
pub fn build_metrics(config: &ProberConfig) -> Result<Arc<LatencyMetrics>, MetricsError> {
    Ok(Arc::new(LatencyMetrics::new(
        &config.observability.latency_buckets_ms,
    )?))
}

/// Build a prober over the built-in catalog.
pub fn build_prober(config: &ProberConfig, metrics: Arc<LatencyMetrics>) -> Prober {
    build_prober_with_catalog(config, ProbeCatalog::builtin(), metrics)
}

/// Build a prober over an explicit catalog.
pub fn build_prober_with_catalog(
    config: &ProberConfig,
    catalog: ProbeCatalog,
    metrics: Arc<LatencyMetrics>,
) -> Prober {
    let executor = RequestExecutor::new(config.prober.request_timeout());
    let recorder = ObservationRecorder::new(metrics);
    let prober = Prober::new(catalog, ProbeSettings::from(config), executor, recorder);

    if config.write_probe.enabled {
        let write_probe = FulcioWriteProbe::new(&config.targets.fulcio_url, &config.write_probe);
        prober.with_write_probe(Arc::new(write_probe))
    } else {
        prober
    }
}

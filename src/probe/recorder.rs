//! Observation recorder: turns executor outcomes into latency samples.

use std::sync::Arc;

use crate::observability::metrics::{LatencyLabels, LatencyMetrics};
use crate::probe::catalog::ProbeDefinition;
use crate::probe::executor::ObservationOutcome;

/// `status_code` label value used when no response was obtained.
pub const NO_STATUS: &str = "none";

#[derive(Clone)]
pub struct ObservationRecorder {
    metrics: Arc<LatencyMetrics>,
}

impl ObservationRecorder {
    pub fn new(metrics: Arc<LatencyMetrics>) -> Self {
        Self { metrics }
    }

    /// Record one outcome, including transport failures.
    pub fn record(&self, host: &str, probe: &ProbeDefinition, outcome: &ObservationOutcome) {
        let labels = labels_for(host, probe, outcome);
        self.metrics.observe(&labels, outcome.latency_millis as f64);
    }
}

fn labels_for(host: &str, probe: &ProbeDefinition, outcome: &ObservationOutcome) -> LatencyLabels {
    LatencyLabels {
        endpoint: probe.endpoint_path.clone(),
        status_code: outcome
            .status_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| NO_STATUS.to_string()),
        host: host.to_string(),
    }
}

//! Latency aggregations and Prometheus exposition.
//!
//! # Responsibilities
//! - Own the two latency aggregations every probe observation feeds
//! - Render them in the Prometheus text format for the `/metrics` endpoint
//!
//! # Metrics
//! - `api_endpoint_latency` (summary): latency quantiles, sum and count
//! - `api_endpoint_latency_histogram` (histogram): bucketed latency
//!
//! Both carry the labels `endpoint`, `status_code` and `host`, always set
//! together from the same [`LatencyLabels`].
//!
//! # Design Decisions
//! - The recorder is owned by [`LatencyMetrics`] and shared through `Arc`;
//!   no global recorder is installed
//! - Synchronization is provided by the Prometheus recorder itself (atomic
//!   histogram buckets), so writers and scrapers never take an external lock

use metrics::{describe_histogram, histogram, with_local_recorder, Unit};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};
use thiserror::Error;

/// Summary series name.
pub const LATENCY_SUMMARY: &str = "api_endpoint_latency";
/// Histogram series name.
pub const LATENCY_HISTOGRAM: &str = "api_endpoint_latency_histogram";

pub const ENDPOINT_LABEL: &str = "endpoint";
pub const STATUS_CODE_LABEL: &str = "status_code";
pub const HOST_LABEL: &str = "host";

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("invalid latency buckets: {0}")]
    Buckets(#[from] BuildError),
}

/// Label set shared by both aggregations for one observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyLabels {
    pub endpoint: String,
    pub status_code: String,
    pub host: String,
}

impl LatencyLabels {
    fn to_pairs(&self) -> [(&'static str, String); 3] {
        [
            (ENDPOINT_LABEL, self.endpoint.clone()),
            (STATUS_CODE_LABEL, self.status_code.clone()),
            (HOST_LABEL, self.host.clone()),
        ]
    }
}

/// Process-lifetime latency aggregations.
pub struct LatencyMetrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl LatencyMetrics {
    /// Build the aggregations with the given histogram bucket bounds (ms).
    pub fn new(buckets_ms: &[f64]) -> Result<Self, MetricsError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(LATENCY_HISTOGRAM.to_string()), buckets_ms)?
            .build_recorder();
        let handle = recorder.handle();

        with_local_recorder(&recorder, || {
            describe_histogram!(
                LATENCY_SUMMARY,
                Unit::Milliseconds,
                "API endpoint latency distribution (milliseconds)"
            );
            describe_histogram!(
                LATENCY_HISTOGRAM,
                Unit::Milliseconds,
                "API endpoint latency histogram (milliseconds)"
            );
        });

        Ok(Self { recorder, handle })
    }

    /// Append one latency sample to both aggregations.
    pub fn observe(&self, labels: &LatencyLabels, latency_ms: f64) {
        let pairs = labels.to_pairs();
        with_local_recorder(&self.recorder, || {
            histogram!(LATENCY_SUMMARY, &pairs).record(latency_ms);
            histogram!(LATENCY_HISTOGRAM, &pairs).record(latency_ms);
        });
    }

    /// Render the current state in Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(status: &str) -> LatencyLabels {
        LatencyLabels {
            endpoint: "/api/v1/log".into(),
            status_code: status.into(),
            host: "http://rekor.local".into(),
        }
    }

    fn count(rendered: &str, series: &str, status: &str) -> Option<u64> {
        let prefix = format!("{}_count{{", series);
        let status = format!("status_code=\"{}\"", status);
        rendered
            .lines()
            .filter(|line| line.starts_with(&prefix) && line.contains(&status))
            .find_map(|line| line.rsplit(' ').next()?.parse().ok())
    }

    #[test]
    fn test_observation_lands_in_both_aggregations() {
        let metrics = LatencyMetrics::new(&[0.0, 200.0, 400.0]).unwrap();
        metrics.observe(&labels("200"), 12.0);

        let rendered = metrics.render();
        assert_eq!(count(&rendered, LATENCY_SUMMARY, "200"), Some(1));
        assert_eq!(count(&rendered, LATENCY_HISTOGRAM, "200"), Some(1));
        assert!(rendered.contains("endpoint=\"/api/v1/log\""));
        assert!(rendered.contains("host=\"http://rekor.local\""));
    }

    #[test]
    fn test_counts_accumulate_per_label_set() {
        let metrics = LatencyMetrics::new(&[100.0]).unwrap();
        for _ in 0..3 {
            metrics.observe(&labels("200"), 5.0);
        }
        metrics.observe(&labels("500"), 5.0);

        let rendered = metrics.render();
        assert_eq!(count(&rendered, LATENCY_HISTOGRAM, "200"), Some(3));
        assert_eq!(count(&rendered, LATENCY_HISTOGRAM, "500"), Some(1));
        assert_eq!(count(&rendered, LATENCY_SUMMARY, "200"), Some(3));

        // Rendering is a read; it must not reset anything.
        assert_eq!(count(&metrics.render(), LATENCY_HISTOGRAM, "200"), Some(3));
    }

    #[test]
    fn test_only_histogram_series_has_buckets() {
        let metrics = LatencyMetrics::new(&[200.0]).unwrap();
        metrics.observe(&labels("200"), 5.0);

        let rendered = metrics.render();
        assert!(rendered
            .lines()
            .any(|l| l.starts_with(&format!("{}_bucket{{", LATENCY_HISTOGRAM))));
        assert!(!rendered
            .lines()
            .any(|l| l.starts_with(&format!("{}_bucket{{", LATENCY_SUMMARY))));
    }

    #[test]
    fn test_empty_buckets_rejected() {
        assert!(matches!(
            LatencyMetrics::new(&[]),
            Err(MetricsError::Buckets(_))
        ));
    }
}

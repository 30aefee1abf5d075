//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the prober.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the prober.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProberConfig {
    /// Probe loop settings (interval, run mode).
    pub prober: LoopConfig,

    /// Base URLs of the probed services.
    pub targets: TargetsConfig,

    /// Fulcio write probe settings.
    pub write_probe: WriteProbeConfig,

    /// Logging and metrics exposition.
    pub observability: ObservabilityConfig,
}

/// Probe loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Seconds to sleep between passes.
    pub interval_secs: u64,

    /// Run a single pass and exit with its status.
    pub one_time: bool,

    /// Treat an observed 5xx response as a pass failure.
    pub fail_on_server_error: bool,

    /// Per-request timeout in seconds. 0 leaves the transport default.
    pub request_timeout_secs: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            one_time: false,
            fail_on_server_error: false,
            request_timeout_secs: 0,
        }
    }
}

impl LoopConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

/// Target service base URLs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Rekor transparency log base URL.
    pub rekor_url: String,

    /// Fulcio certificate authority base URL.
    pub fulcio_url: String,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            rekor_url: "https://rekor.sigstore.dev".to_string(),
            fulcio_url: "https://fulcio.sigstore.dev".to_string(),
        }
    }
}

/// Fulcio write probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WriteProbeConfig {
    /// Run the signing-certificate round trip every pass.
    pub enabled: bool,

    /// File holding the OIDC identity token (projected service account token).
    pub identity_token_path: String,

    /// Timeout for the signing request in seconds. 0 leaves the transport default.
    pub timeout_secs: u64,
}

impl Default for WriteProbeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            identity_token_path: "/var/run/sigstore/cosign/oidc-token".to_string(),
            timeout_secs: 30,
        }
    }
}

impl WriteProbeConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Metrics endpoint bind address. A bare ":port" binds all interfaces.
    pub metrics_address: String,

    /// Upper bounds (milliseconds) of the latency histogram buckets.
    pub latency_buckets_ms: Vec<f64>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_address: ":8080".to_string(),
            latency_buckets_ms: vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0],
        }
    }
}

impl ObservabilityConfig {
    /// The `host:port` the metrics listener binds. Hostnames are resolved at bind time.
    pub fn metrics_bind_address(&self) -> String {
        let addr = &self.metrics_address;
        if addr.starts_with(':') {
            format!("0.0.0.0{}", addr)
        } else {
            addr.clone()
        }
    }
}

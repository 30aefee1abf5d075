//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval > 0, buckets increasing)
//! - Check that target URLs parse and the metrics address has a host:port shape
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProberConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::ProberConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("prober.interval_secs must be greater than zero")]
    ZeroInterval,

    #[error("invalid {field} '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid observability.metrics_address '{0}'")]
    InvalidMetricsAddress(String),

    #[error("observability.latency_buckets_ms must be non-empty, finite and strictly increasing")]
    InvalidBuckets,

    #[error("unknown observability.log_format '{0}' (expected \"pretty\" or \"json\")")]
    UnknownLogFormat(String),

    #[error("write_probe.identity_token_path must be set when the write probe is enabled")]
    MissingTokenPath,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProberConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.prober.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }

    for (field, value) in [
        ("targets.rekor_url", &config.targets.rekor_url),
        ("targets.fulcio_url", &config.targets.fulcio_url),
    ] {
        if let Err(reason) = check_base_url(value) {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.clone(),
                reason,
            });
        }
    }

    if !is_host_port(&config.observability.metrics_bind_address()) {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let buckets = &config.observability.latency_buckets_ms;
    let increasing = buckets.windows(2).all(|w| w[0] < w[1]);
    if buckets.is_empty() || !increasing || buckets.iter().any(|b| !b.is_finite()) {
        errors.push(ValidationError::InvalidBuckets);
    }

    let format = config.observability.log_format.as_str();
    if format != "pretty" && format != "json" {
        errors.push(ValidationError::UnknownLogFormat(format.to_string()));
    }

    if config.write_probe.enabled && config.write_probe.identity_token_path.trim().is_empty() {
        errors.push(ValidationError::MissingTokenPath);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_host_port(addr: &str) -> bool {
    match addr.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}

fn check_base_url(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}'", other)),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}

//! Request executor.
//!
//! # Responsibilities
//! - Build one HTTP request from a probe definition and a base host
//! - Time it from dispatch until response headers (or failure)
//! - Drain the response so the connection goes back to the pool
//!
//! # Design Decisions
//! - Any HTTP status, 4xx/5xx included, is an observation, not an error
//! - Only transport failures and unbuildable requests set `error`
//! - No timeout unless one is configured; the transport default applies

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

use crate::probe::catalog::ProbeDefinition;

/// Why a probe produced no status code.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The request could not be constructed (bad base URL or path).
    #[error("invalid request for {url}: {reason}")]
    InvalidRequest { url: String, reason: String },

    /// DNS, connect, TLS or timeout failure; no response was obtained.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ProbeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Transport(e) if e.is_timeout())
    }
}

/// The result of executing one probe.
#[derive(Debug)]
pub struct ObservationOutcome {
    pub endpoint_path: String,
    pub host: String,
    pub status_code: Option<u16>,
    pub latency_millis: u64,
    pub error: Option<ProbeError>,
}

impl ObservationOutcome {
    pub fn is_transport_failure(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.status_code, Some(code) if (500..600).contains(&code))
    }
}

/// Issues probe requests over a shared, pooled HTTP client.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: Client,
    timeout: Option<Duration>,
}

impl RequestExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self::with_client(Client::new(), timeout)
    }

    pub fn with_client(client: Client, timeout: Option<Duration>) -> Self {
        Self { client, timeout }
    }

    /// Execute `probe` against `base_host`.
    pub async fn execute(&self, base_host: &str, probe: &ProbeDefinition) -> ObservationOutcome {
        let mut outcome = ObservationOutcome {
            endpoint_path: probe.endpoint_path.clone(),
            host: base_host.to_string(),
            status_code: None,
            latency_millis: 0,
            error: None,
        };

        let request = match self.build_request(base_host, probe) {
            Ok(request) => request,
            Err(e) => {
                outcome.error = Some(e);
                return outcome;
            }
        };

        tracing::debug!(
            method = %probe.method,
            url = %request.url(),
            "Observing endpoint"
        );

        let start = Instant::now();
        let result = self.client.execute(request).await;
        outcome.latency_millis = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) => {
                let status = response.status();
                outcome.status_code = Some(status.as_u16());
                if let Err(e) = response.bytes().await {
                    tracing::debug!(
                        endpoint = %probe.endpoint_path,
                        error = %e,
                        "Failed to drain response body"
                    );
                }
            }
            Err(e) => {
                outcome.error = Some(ProbeError::Transport(e));
            }
        }

        outcome
    }

    fn build_request(
        &self,
        base_host: &str,
        probe: &ProbeDefinition,
    ) -> Result<reqwest::Request, ProbeError> {
        let raw = format!("{}{}", base_host, probe.endpoint_path);
        let mut url = Url::parse(&raw).map_err(|e| ProbeError::InvalidRequest {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        if !probe.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &probe.query_params {
                pairs.append_pair(key, value);
            }
        }

        let mut builder = self
            .client
            .request(probe.method.clone(), url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(probe.body.clone());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(|e| ProbeError::InvalidRequest {
            url: raw,
            reason: e.to_string(),
        })
    }
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new(None)
    }
}

//! Fulcio signing-certificate write probe.
//!
//! # Responsibilities
//! - Request a short-lived signing certificate with a fresh key
//! - Verify that a certificate chain was issued
//! - Report the round trip as a single pass-level success or failure

use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::WriteProbeConfig;
use crate::signing::identity::IdentityToken;
use crate::signing::keys::{EphemeralKey, ALGORITHM};
use crate::signing::types::{
    Credentials, PublicKey, PublicKeyRequest, SigningCertRequest, SigningCertResponse,
    WriteProbeError, WriteProbeResult,
};
use crate::signing::WriteProbe;

pub const SIGNING_CERT_PATH: &str = "/api/v2/signingCert";

pub struct FulcioWriteProbe {
    client: Client,
    fulcio_url: String,
    token_path: PathBuf,
    timeout: Option<Duration>,
}

impl FulcioWriteProbe {
    pub fn new(fulcio_url: impl Into<String>, config: &WriteProbeConfig) -> Self {
        Self {
            client: Client::new(),
            fulcio_url: fulcio_url.into(),
            token_path: PathBuf::from(&config.identity_token_path),
            timeout: config.timeout(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn build_request(token: &IdentityToken, key: &EphemeralKey) -> WriteProbeResult<SigningCertRequest> {
        Ok(SigningCertRequest {
            credentials: Credentials {
                oidc_identity_token: token.raw().to_string(),
            },
            public_key_request: PublicKeyRequest {
                public_key: PublicKey {
                    algorithm: ALGORITHM.to_string(),
                    content: key.public_key_pem()?,
                },
                proof_of_possession: key.proof_of_possession(token.subject()),
            },
        })
    }

    async fn request_certificate(&self, body: &SigningCertRequest) -> WriteProbeResult<SigningCertResponse> {
        let url = format!("{}{}", self.fulcio_url, SIGNING_CERT_PATH);
        let mut request = self.client.post(&url).json(body);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WriteProbeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| WriteProbeError::Response(format!("malformed JSON: {}", e)))
    }
}

#[async_trait]
impl WriteProbe for FulcioWriteProbe {
    fn name(&self) -> &str {
        "fulcio-signing-cert"
    }

    async fn run(&self) -> WriteProbeResult<()> {
        let token = IdentityToken::from_file(&self.token_path).await?;
        let key = EphemeralKey::generate();
        let body = Self::build_request(&token, &key)?;

        let start = Instant::now();
        let response = self.request_certificate(&body).await?;
        let chain_len = response.verify()?;

        tracing::info!(
            host = %self.fulcio_url,
            subject = %token.subject(),
            chain_len,
            latency_ms = start.elapsed().as_millis() as u64,
            "Fulcio issued signing certificate"
        );
        Ok(())
    }
}

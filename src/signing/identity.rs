//! OIDC identity token handling.
//!
//! # Security
//! - Tokens are re-read from disk on every probe (projected tokens rotate)
//! - Token contents are never logged; only the subject is
//! - The JWT signature is not verified here; Fulcio verifies it

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use std::path::Path;

use crate::signing::types::{WriteProbeError, WriteProbeResult};

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// A raw OIDC token plus the subject Fulcio expects a proof over.
#[derive(Clone)]
pub struct IdentityToken {
    raw: String,
    subject: String,
}

impl std::fmt::Debug for IdentityToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityToken")
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

impl IdentityToken {
    /// Read and parse a token file.
    pub async fn from_file(path: &Path) -> WriteProbeResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| WriteProbeError::TokenRead {
                path: path.display().to_string(),
                source,
            })?;
        Self::parse(raw.trim())
    }

    /// Parse a compact JWT, taking `email` if present, else `sub`.
    pub fn parse(raw: &str) -> WriteProbeResult<Self> {
        let mut parts = raw.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(WriteProbeError::Token("expected three JWT segments".to_string())),
        };

        let decoded = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| WriteProbeError::Token(format!("payload is not base64url: {}", e)))?;
        let claims: Claims = serde_json::from_slice(&decoded)
            .map_err(|e| WriteProbeError::Token(format!("payload is not JSON: {}", e)))?;

        let subject = claims
            .email
            .or(claims.sub)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| WriteProbeError::Token("no subject claim".to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            subject,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

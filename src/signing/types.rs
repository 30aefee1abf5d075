//! Fulcio API types and write probe errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during the write probe round trip.
#[derive(Debug, Error)]
pub enum WriteProbeError {
    /// Identity token could not be read.
    #[error("failed to read identity token from {path}: {source}")]
    TokenRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Identity token is not a usable JWT.
    #[error("invalid identity token: {0}")]
    Token(String),

    /// Ephemeral key generation or encoding failed.
    #[error("key error: {0}")]
    Key(String),

    /// Transport failure talking to Fulcio.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Fulcio answered with a non-success status.
    #[error("Fulcio returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Fulcio answered 2xx but the certificate chain did not check out.
    #[error("invalid signing certificate response: {0}")]
    Response(String),
}

/// Result type for write probe operations.
pub type WriteProbeResult<T> = Result<T, WriteProbeError>;

/// `POST /api/v2/signingCert` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningCertRequest {
    pub credentials: Credentials,
    pub public_key_request: PublicKeyRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub oidc_identity_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyRequest {
    pub public_key: PublicKey,
    /// Base64 DER signature over the token subject.
    pub proof_of_possession: String,
}

#[derive(Debug, Serialize)]
pub struct PublicKey {
    pub algorithm: String,
    /// PEM-encoded SubjectPublicKeyInfo.
    pub content: String,
}

/// `POST /api/v2/signingCert` response body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningCertResponse {
    #[serde(default)]
    pub signed_certificate_embedded_sct: Option<SignedCertificate>,
    #[serde(default)]
    pub signed_certificate_detached_sct: Option<SignedCertificate>,
}

#[derive(Debug, Deserialize)]
pub struct SignedCertificate {
    pub chain: CertificateChain,
}

#[derive(Debug, Deserialize)]
pub struct CertificateChain {
    pub certificates: Vec<String>,
}

const PEM_CERT_HEADER: &str = "-----BEGIN CERTIFICATE-----";

impl SigningCertResponse {
    /// The issued chain, leaf first.
    pub fn chain(&self) -> Option<&[String]> {
        self.signed_certificate_embedded_sct
            .as_ref()
            .or(self.signed_certificate_detached_sct.as_ref())
            .map(|signed| signed.chain.certificates.as_slice())
    }

    /// Check that a non-empty chain of PEM certificates was issued.
    pub fn verify(&self) -> WriteProbeResult<usize> {
        let chain = self
            .chain()
            .ok_or_else(|| WriteProbeError::Response("no certificate chain".to_string()))?;
        let leaf = chain
            .first()
            .ok_or_else(|| WriteProbeError::Response("empty certificate chain".to_string()))?;
        if !leaf.trim_start().starts_with(PEM_CERT_HEADER) {
            return Err(WriteProbeError::Response(
                "leaf is not a PEM certificate".to_string(),
            ));
        }
        Ok(chain.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_in_camel_case() {
        let request = SigningCertRequest {
            credentials: Credentials {
                oidc_identity_token: "tok".into(),
            },
            public_key_request: PublicKeyRequest {
                public_key: PublicKey {
                    algorithm: "ECDSA".into(),
                    content: "pem".into(),
                },
                proof_of_possession: "sig".into(),
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["credentials"]["oidcIdentityToken"], "tok");
        assert_eq!(json["publicKeyRequest"]["publicKey"]["algorithm"], "ECDSA");
        assert_eq!(json["publicKeyRequest"]["proofOfPossession"], "sig");
    }

    #[test]
    fn test_verify_embedded_chain() {
        let response: SigningCertResponse = serde_json::from_str(
            r#"{"signedCertificateEmbeddedSct":{"chain":{"certificates":[
                "-----BEGIN CERTIFICATE-----\nleaf\n-----END CERTIFICATE-----\n",
                "-----BEGIN CERTIFICATE-----\nroot\n-----END CERTIFICATE-----\n"]}}}"#,
        )
        .unwrap();
        assert_eq!(response.verify().unwrap(), 2);
    }

    #[test]
    fn test_verify_detached_chain() {
        let response: SigningCertResponse = serde_json::from_str(
            r#"{"signedCertificateDetachedSct":{"chain":{"certificates":[
                "-----BEGIN CERTIFICATE-----\nleaf\n-----END CERTIFICATE-----\n"]}}}"#,
        )
        .unwrap();
        assert_eq!(response.verify().unwrap(), 1);
    }

    #[test]
    fn test_verify_rejects_missing_or_bogus_chain() {
        assert!(SigningCertResponse::default().verify().is_err());

        let empty: SigningCertResponse = serde_json::from_str(
            r#"{"signedCertificateEmbeddedSct":{"chain":{"certificates":[]}}}"#,
        )
        .unwrap();
        assert!(matches!(empty.verify(), Err(WriteProbeError::Response(_))));

        let bogus: SigningCertResponse = serde_json::from_str(
            r#"{"signedCertificateEmbeddedSct":{"chain":{"certificates":["hello"]}}}"#,
        )
        .unwrap();
        assert!(bogus.verify().is_err());
    }
}

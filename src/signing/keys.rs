//! Ephemeral signing keys.
//!
//! # Security
//! - A fresh P-256 key is generated for every write probe and dropped after
//! - Private key material is never logged or serialized

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use p256::pkcs8::{EncodePublicKey, LineEnding};
use rand::rngs::OsRng;

use crate::signing::types::{WriteProbeError, WriteProbeResult};

/// Algorithm name Fulcio expects for P-256 keys.
pub const ALGORITHM: &str = "ECDSA";

pub struct EphemeralKey {
    signing_key: SigningKey,
}

impl EphemeralKey {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// PEM-encoded SubjectPublicKeyInfo.
    pub fn public_key_pem(&self) -> WriteProbeResult<String> {
        self.signing_key
            .verifying_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| WriteProbeError::Key(format!("failed to encode public key: {}", e)))
    }

    /// Base64 DER ECDSA signature over `message`.
    pub fn proof_of_possession(&self, message: &str) -> String {
        let signature: Signature = self.signing_key.sign(message.as_bytes());
        STANDARD.encode(signature.to_der().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::ecdsa::signature::Verifier;
    use p256::ecdsa::{DerSignature, VerifyingKey};
    use p256::pkcs8::DecodePublicKey;

    #[test]
    fn test_proof_verifies_against_exported_key() {
        let key = EphemeralKey::generate();
        let pem = key.public_key_pem().unwrap();
        assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----"));

        let proof = key.proof_of_possession("prober@example.com");
        let der = STANDARD.decode(proof).unwrap();
        let signature = DerSignature::try_from(der.as_slice()).unwrap();
        let verifying_key = VerifyingKey::from_public_key_pem(&pem).unwrap();
        assert!(verifying_key
            .verify(b"prober@example.com", &signature)
            .is_ok());
        assert!(verifying_key.verify(b"someone-else", &signature).is_err());
    }

    #[test]
    fn test_keys_are_fresh() {
        let a = EphemeralKey::generate().public_key_pem().unwrap();
        let b = EphemeralKey::generate().public_key_pem().unwrap();
        assert_ne!(a, b);
    }
}

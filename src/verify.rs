//! Discord request signature verification.
//!
//! Discord signs every interaction webhook with the application's Ed25519
//! key. The signed message is the `X-Signature-Timestamp` header followed
//! by the raw request body, and the signature arrives hex encoded in
//! `X-Signature-Ed25519`.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::error::{DispairError, DispairResult};

pub const SIGNATURE_HEADER: &str = "X-Signature-Ed25519";
pub const TIMESTAMP_HEADER: &str = "X-Signature-Timestamp";

#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    public_key: VerifyingKey,
}

impl SignatureVerifier {
    /// Create from the hex-encoded application public key.
    pub fn from_hex(public_key_hex: &str) -> DispairResult<Self> {
        let key_bytes = hex::decode(public_key_hex.trim())
            .map_err(|e| DispairError::Config(format!("application public key: {e}")))?;
        let key_array: [u8; 32] = key_bytes.try_into().map_err(|_| {
            DispairError::Config("application public key must be 32 bytes".into())
        })?;

        Self::from_bytes(&key_array)
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> DispairResult<Self> {
        let public_key = VerifyingKey::from_bytes(bytes)
            .map_err(|e| DispairError::Config(format!("application public key: {e}")))?;

        Ok(Self { public_key })
    }

    /// Check `signature_hex` over `timestamp ++ body`.
    pub fn verify(&self, timestamp: &str, body: &[u8], signature_hex: &str) -> DispairResult<()> {
        let sig_bytes = hex::decode(signature_hex).map_err(|_| DispairError::InvalidSignature)?;
        let sig_array: [u8; 64] = sig_bytes
            .try_into()
            .map_err(|_| DispairError::InvalidSignature)?;
        let signature = Signature::from_bytes(&sig_array);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.public_key
            .verify(&message, &signature)
            .map_err(|_| DispairError::InvalidSignature)
    }
}

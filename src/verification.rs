//! Webhook signature verification.
//!
//! Paystack signs each delivery with HMAC-SHA512 over the raw request body,
//! using the webhook secret from the dashboard, and sends the hex-encoded
//! digest in the `x-paystack-signature` header.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

type HmacSha512 = Hmac<Sha512>;

/// Outcome of verifying a single delivery. Scoped to one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    Rejected(RejectionReason),
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified)
    }
}

/// Why a signature was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    #[error("signature is not a valid hex digest")]
    MalformedSignature,
    #[error("signature does not match the payload digest")]
    DigestMismatch,
}

/// Trait for verifying webhook signatures
///
/// The stock implementation is [`HmacSha512Verifier`]; implement this trait
/// to plug in a different scheme (or a passthrough for tests).
#[async_trait]
pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature` against the raw payload bytes.
    async fn verify(&self, payload: &[u8], signature: &str) -> Verification;
}

/// HMAC-SHA512 verifier with timing-safe comparison
///
/// Computes the keyed digest over the exact bytes the provider signed and
/// compares it to the hex-encoded signature from the request header.
pub struct HmacSha512Verifier {
    secret: Vec<u8>,
}

impl HmacSha512Verifier {
    /// Create a verifier for the given webhook secret.
    ///
    /// An empty secret is a configuration error and is rejected before the
    /// module starts, not here.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn compute_digest(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac =
            HmacSha512::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

#[async_trait]
impl SignatureVerifier for HmacSha512Verifier {
    async fn verify(&self, payload: &[u8], signature: &str) -> Verification {
        let provided = match hex::decode(signature) {
            Ok(bytes) => bytes,
            Err(_) => {
                // Diagnostic log on rejection only
                tracing::warn!("Rejecting webhook: signature is not valid hex");
                return Verification::Rejected(RejectionReason::MalformedSignature);
            }
        };

        let expected = self.compute_digest(payload);

        if !constant_time_compare(&expected, &provided) {
            tracing::warn!("Rejecting webhook: signature mismatch");
            return Verification::Rejected(RejectionReason::DigestMismatch);
        }

        Verification::Verified
    }
}

/// Passthrough verifier that accepts all deliveries
///
/// **WARNING:** accepts everything without verification. Only for local
/// development or tests. Never use in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVerification;

#[async_trait]
impl SignatureVerifier for NoVerification {
    async fn verify(&self, _payload: &[u8], _signature: &str) -> Verification {
        tracing::warn!("NoVerification verifier used - all webhooks accepted without verification");
        Verification::Verified
    }
}

/// Constant-time comparison to prevent timing attacks
///
/// Uses the `subtle` crate, which is resistant to compiler optimizations
/// that would turn bitwise operations back into timing-leaking branches.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

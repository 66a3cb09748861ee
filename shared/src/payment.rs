//! Payment webhook verification
//!
//! The processor signs `order|status|amount|txid|ts` with HMAC-SHA256 and
//! sends the hex digest in `X-Signature`. Integrations that cannot sign send a
//! shared static token in `X-Webhook-Token` instead; which of the two is
//! accepted is a deployment choice ([`VerificationMode`]).

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-signature";
pub const TOKEN_HEADER: &str = "x-webhook-token";
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Event delivered by the payment processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Order intent id
    pub order: String,
    pub status: String,
    /// Amount in cents
    pub amount: i64,
    /// Processor transaction id (idempotency key)
    pub txid: String,
    /// Unix seconds
    pub ts: i64,
}

impl WebhookPayload {
    /// Canonical signed message, fields in fixed order
    pub fn canonical_message(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.order, self.status, self.amount, self.txid, self.ts
        )
    }

    pub fn outcome(&self) -> PaymentOutcome {
        PaymentOutcome::from_status(&self.status)
    }
}

/// Processor status classified for intent handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Approved,
    Failed,
    /// Anything else (e.g. "pending"): acknowledged, no state change
    Pending,
}

impl PaymentOutcome {
    pub fn from_status(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "approved" | "paid" => Self::Approved,
            "failed" | "rejected" | "declined" | "cancelled" | "canceled" | "refused" => {
                Self::Failed
            }
            _ => Self::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMode {
    #[default]
    Hmac,
    Token,
    Either,
}

impl VerificationMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hmac" => Some(Self::Hmac),
            "token" => Some(Self::Token),
            "either" | "both" => Some(Self::Either),
            _ => None,
        }
    }

    pub fn accepts_hmac(&self) -> bool {
        matches!(self, Self::Hmac | Self::Either)
    }

    pub fn accepts_token(&self) -> bool {
        matches!(self, Self::Token | Self::Either)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing webhook credentials")]
    Missing,
    #[error("signature is not valid hex")]
    MalformedSignature,
    #[error("webhook signature mismatch")]
    Mismatch,
    #[error("webhook token mismatch")]
    TokenMismatch,
    #[error("webhook timestamp outside tolerance ({skew}s)")]
    Stale { skew: u64 },
    #[error("HMAC key error")]
    Key,
}

fn mac_for(secret: &str) -> Result<HmacSha256, SignatureError> {
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Key)
}

/// Hex HMAC-SHA256 of the canonical message
pub fn sign(secret: &str, payload: &WebhookPayload) -> Result<String, SignatureError> {
    let mut mac = mac_for(secret)?;
    mac.update(payload.canonical_message().as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify `signature_hex` and the timestamp window. `now` is Unix seconds.
pub fn verify_signature(
    secret: &str,
    payload: &WebhookPayload,
    signature_hex: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<(), SignatureError> {
    let sig_bytes =
        hex::decode(signature_hex.trim()).map_err(|_| SignatureError::MalformedSignature)?;
    let mut mac = mac_for(secret)?;
    mac.update(payload.canonical_message().as_bytes());
    mac.verify_slice(&sig_bytes)
        .map_err(|_| SignatureError::Mismatch)?;

    let skew = now.abs_diff(payload.ts);
    if skew > u64::try_from(tolerance_secs).unwrap_or(0) {
        return Err(SignatureError::Stale { skew });
    }
    Ok(())
}

/// Constant-time static token comparison.
///
/// Both sides are MACed under the expected token so the comparison runs over
/// fixed-length digests regardless of the presented length.
pub fn verify_token(expected: &str, presented: &str) -> Result<(), SignatureError> {
    if expected.is_empty() {
        return Err(SignatureError::TokenMismatch);
    }
    let digest = |value: &str| -> Result<Vec<u8>, SignatureError> {
        let mut mac = mac_for(expected)?;
        mac.update(value.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    };
    let expected_digest = digest(expected)?;
    let mut mac = mac_for(expected)?;
    mac.update(presented.as_bytes());
    mac.verify_slice(&expected_digest)
        .map_err(|_| SignatureError::TokenMismatch)
}

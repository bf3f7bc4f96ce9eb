//! Svix-style webhook signature verification.
//!
//! # Security
//!
//! - HMAC-SHA256 over `{id}.{timestamp}.{body}` with constant-time comparison
//! - Timestamp window check against replayed deliveries
//! - Secret held in `secrecy::SecretString` until decoded into key bytes

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const SECRET_PREFIX: &str = "whsec_";

/// Errors raised while verifying a webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    #[error("Missing svix headers")]
    MissingHeaders,

    #[error("Invalid webhook timestamp")]
    InvalidTimestamp,

    #[error("Webhook timestamp outside tolerance ({age_secs}s)")]
    TimestampOutOfTolerance { age_secs: i64 },

    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Webhook signing secret is not configured correctly")]
    InvalidSecret,

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),
}

impl WebhookError {
    /// True when the error comes from our own configuration rather than the caller.
    pub fn is_server_side(&self) -> bool {
        matches!(self, WebhookError::InvalidSecret)
    }
}

/// The three delivery headers, as received.
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    pub id: String,
    pub timestamp: String,
    pub signature: String,
}

impl SignedHeaders {
    /// Collects the headers, failing if any is missing or blank.
    pub fn from_parts(
        id: Option<&str>,
        timestamp: Option<&str>,
        signature: Option<&str>,
    ) -> Result<Self, WebhookError> {
        match (id, timestamp, signature) {
            (Some(id), Some(ts), Some(sig))
                if !id.is_empty() && !ts.is_empty() && !sig.is_empty() =>
            {
                Ok(Self {
                    id: id.to_string(),
                    timestamp: ts.to_string(),
                    signature: sig.to_string(),
                })
            }
            _ => Err(WebhookError::MissingHeaders),
        }
    }
}

/// Verifies webhook deliveries signed with a `whsec_` secret.
pub struct SvixVerifier {
    key: Vec<u8>,
    tolerance_secs: u64,
}

impl SvixVerifier {
    /// Creates a verifier from a `whsec_<base64>` secret.
    pub fn new(secret: &SecretString, tolerance_secs: u64) -> Result<Self, WebhookError> {
        let encoded = secret
            .expose_secret()
            .strip_prefix(SECRET_PREFIX)
            .ok_or(WebhookError::InvalidSecret)?;
        let key = STANDARD
            .decode(encoded)
            .map_err(|_| WebhookError::InvalidSecret)?;
        if key.is_empty() {
            return Err(WebhookError::InvalidSecret);
        }

        Ok(Self {
            key,
            tolerance_secs,
        })
    }

    /// Verifies a delivery against the current time.
    pub fn verify(&self, headers: &SignedHeaders, body: &[u8]) -> Result<(), WebhookError> {
        self.verify_at(headers, body, chrono::Utc::now().timestamp())
    }

    fn verify_at(
        &self,
        headers: &SignedHeaders,
        body: &[u8],
        now: i64,
    ) -> Result<(), WebhookError> {
        let timestamp: i64 = headers
            .timestamp
            .trim()
            .parse()
            .map_err(|_| WebhookError::InvalidTimestamp)?;

        let age = now
            .checked_sub(timestamp)
            .ok_or(WebhookError::InvalidTimestamp)?;
        if age.unsigned_abs() > self.tolerance_secs {
            tracing::warn!(
                webhook_id = %headers.id,
                age_secs = age,
                "Webhook timestamp outside tolerance - possible replay"
            );
            return Err(WebhookError::TimestampOutOfTolerance { age_secs: age });
        }

        let expected = self.sign(&headers.id, timestamp, body)?;

        // Several space-separated `v1,<base64>` entries may be present during key rotation.
        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == "v1")
            .filter_map(|(_, sig)| STANDARD.decode(sig).ok())
            .any(|provided| expected.as_slice().ct_eq(&provided).unwrap_u8() == 1);

        if !matched {
            tracing::warn!(webhook_id = %headers.id, "Invalid webhook signature");
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    fn sign(&self, id: &str, timestamp: i64, body: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).map_err(|_| WebhookError::InvalidSecret)?;
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(body);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl std::fmt::Debug for SvixVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvixVerifier")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish_non_exhaustive()
    }
}

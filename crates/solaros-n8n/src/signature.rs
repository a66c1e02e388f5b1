use crate::error::{N8nError, N8nResult};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the payload signature on inbound n8n webhooks
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Shared secret used to sign webhook bodies
#[derive(Clone, Debug)]
pub struct WebhookSecret(Arc<SecretString>);

impl WebhookSecret {
    pub fn new(secret: String) -> Self {
        Self(Arc::new(SecretString::from(secret)))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Compute the signature n8n is expected to send for `body`
///
/// The value is the lowercase hex HMAC-SHA256 of the raw body keyed by the
/// shared secret, prefixed with `sha256=`.
pub fn sign_payload(body: &[u8], secret: &WebhookSecret) -> N8nResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.expose().as_bytes())
        .map_err(|e| N8nError::HmacError(e.to_string()))?;
    mac.update(body);
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

/// Verify a signature header value against `body`
///
/// Accepts the hex digest with or without the `sha256=` prefix. The digest
/// comparison is constant-time.
pub fn verify_signature(body: &[u8], signature: &str, secret: &WebhookSecret) -> N8nResult<()> {
    let signature_hex = signature
        .trim()
        .strip_prefix("sha256=")
        .unwrap_or(signature.trim());

    let provided = hex::decode(signature_hex)
        .map_err(|e| N8nError::InvalidSignatureFormat(format!("Invalid hex encoding: {}", e)))?;

    let mut mac = HmacSha256::new_from_slice(secret.expose().as_bytes())
        .map_err(|e| N8nError::HmacError(e.to_string()))?;
    mac.update(body);
    let expected = mac.finalize().into_bytes();

    if expected.ct_eq(&provided).into() {
        Ok(())
    } else {
        Err(N8nError::VerificationFailed)
    }
}

use crate::{error::ApiError, state::WebhookAuth};
use axum::{
    extract::{FromRef, FromRequest, Request},
    http::header::HeaderMap,
};
use solaros_n8n::{SIGNATURE_HEADER, verify_signature};
use tracing::warn;

/// Upper bound on webhook bodies read into memory
const MAX_WEBHOOK_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Raw webhook body whose signature, if any, has been verified
///
/// When the `x-webhook-signature` header is present it must be the
/// HMAC-SHA256 of the body under the shared secret, or the request is
/// rejected with 401. A missing header is accepted unless
/// `WebhookAuth::require_signature` is set.
#[derive(Debug)]
pub struct SignedWebhookPayload(pub Vec<u8>);

impl<S> FromRequest<S> for SignedWebhookPayload
where
    WebhookAuth: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let auth = WebhookAuth::from_ref(state);
        let (parts, body) = req.into_parts();

        let signature = extract_signature(&parts.headers)?;

        let body_bytes = axum::body::to_bytes(body, MAX_WEBHOOK_BODY_BYTES)
            .await
            .map_err(|e| ApiError::InvalidPayload(format!("Failed to read request body: {}", e)))?
            .to_vec();

        match signature {
            Some(signature) => {
                verify_signature(&body_bytes, signature, &auth.secret).map_err(|e| {
                    warn!("Rejected webhook with bad signature: {}", e);
                    ApiError::from(e)
                })?;
            }
            None if auth.require_signature => {
                warn!("Rejected unsigned webhook");
                return Err(ApiError::InvalidSignature(format!(
                    "{} header not found",
                    SIGNATURE_HEADER
                )));
            }
            None => {}
        }

        Ok(SignedWebhookPayload(body_bytes))
    }
}

/// Read the signature header, if present
fn extract_signature(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    headers
        .get(SIGNATURE_HEADER)
        .map(|value| {
            value
                .to_str()
                .map_err(|e| ApiError::InvalidSignature(format!("Invalid header encoding: {}", e)))
        })
        .transpose()
}

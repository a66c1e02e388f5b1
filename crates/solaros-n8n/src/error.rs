use thiserror::Error;

/// n8n crate error types
#[derive(Debug, Error)]
pub enum N8nError {
    #[error("Invalid signature format: {0}")]
    InvalidSignatureFormat(String),

    #[error("Signature mismatch")]
    VerificationFailed,

    #[error("HMAC initialization failed: {0}")]
    HmacError(String),

    #[error("Webhook trigger failed for {workflow_id}: HTTP {status}")]
    TriggerFailed { workflow_id: String, status: u16 },

    #[error("n8n request failed: {0}")]
    Request(#[from] reqwest::Error),
}

pub type N8nResult<T> = Result<T, N8nError>;

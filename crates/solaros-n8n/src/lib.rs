pub mod client;
pub mod error;
pub mod signature;

// Re-export commonly used types
pub use client::{N8nClient, N8nHealth, Urgency};
pub use error::{N8nError, N8nResult};
pub use signature::{SIGNATURE_HEADER, WebhookSecret, sign_payload, verify_signature};

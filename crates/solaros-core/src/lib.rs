pub mod config;
pub mod error;
pub mod event;
pub mod rate_limit;
pub mod validation;

// Re-export commonly used types
pub use config::{RateLimitConfig, ServerConfig};
pub use error::{CoreError, CoreResult};
pub use event::{
    CompletionData, CustomerFollowup, InventoryReordered, JobCompleted, LeadProcessed,
    WebhookEvent, WebhookPayload, display_field,
};
pub use rate_limit::{RateLimitDecision, RateLimiter};

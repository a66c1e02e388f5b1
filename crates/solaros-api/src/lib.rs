pub mod error;
pub mod extractors;
pub mod health;
pub mod rate_limit;
pub mod router;
pub mod state;
pub mod webhook_handler;

// Re-export commonly used types
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use extractors::SignedWebhookPayload;
pub use health::{api_health, health, status};
pub use rate_limit::enforce_rate_limit;
pub use router::create_router;
pub use state::{AppState, WebhookAuth};
pub use webhook_handler::{WebhookResponse, dispatch_event, handle_webhook};

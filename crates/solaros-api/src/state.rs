use axum::extract::FromRef;
use solaros_core::{RateLimitConfig, RateLimiter, config::DEFAULT_ENVIRONMENT};
use solaros_db::DataStore;
use solaros_n8n::{N8nClient, WebhookSecret};
use std::sync::Arc;

/// Inbound webhook authentication settings
#[derive(Clone, Debug)]
pub struct WebhookAuth {
    /// Shared secret the signature header is checked against
    pub secret: WebhookSecret,

    /// Reject requests without a signature header
    pub require_signature: bool,
}

impl WebhookAuth {
    pub fn new(secret: WebhookSecret, require_signature: bool) -> Self {
        Self {
            secret,
            require_signature,
        }
    }
}

/// Application state for Axum dependency injection
///
/// Shared resources needed by handlers:
/// - Data store the webhook handlers write through
/// - Webhook signature settings
/// - Process-wide rate limiter
/// - n8n client for health checks and outbound triggers, when an API URL is configured
#[derive(Clone)]
pub struct AppState {
    pub data_store: Arc<dyn DataStore>,

    pub webhook_auth: WebhookAuth,

    pub rate_limiter: Arc<RateLimiter>,

    pub n8n_client: Option<Arc<N8nClient>>,

    /// Deployment environment reported by `/api/status`
    pub environment: String,
}

impl AppState {
    /// Create new application state with an empty rate limit table
    pub fn new(
        data_store: Arc<dyn DataStore>,
        webhook_auth: WebhookAuth,
        rate_limit: &RateLimitConfig,
        n8n_client: Option<N8nClient>,
    ) -> Self {
        Self {
            data_store,
            webhook_auth,
            rate_limiter: Arc::new(RateLimiter::new(rate_limit)),
            n8n_client: n8n_client.map(Arc::new),
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }
}

impl FromRef<AppState> for WebhookAuth {
    fn from_ref(state: &AppState) -> Self {
        state.webhook_auth.clone()
    }
}

/// Lets the rate limit middleware run with just the limiter as state
impl FromRef<AppState> for Arc<RateLimiter> {
    fn from_ref(state: &AppState) -> Self {
        state.rate_limiter.clone()
    }
}

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of requests admitted per window
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Default window length: 15 minutes
pub const DEFAULT_WINDOW_MS: u64 = 15 * 60 * 1000;

/// Rate limiter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests admitted per identifier per window
    pub max_requests: u32,

    /// Window length in milliseconds
    pub window_ms: u64,

    /// Install the rate limit middleware on the router
    #[serde(default)]
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window_ms: DEFAULT_WINDOW_MS,
            enabled: false,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Reject settings that would make every window degenerate
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_requests == 0 {
            return Err(CoreError::InvalidConfig(
                "rate_limit.max_requests must be greater than 0".to_string(),
            ));
        }
        if self.window_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "rate_limit.window_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Environment name used when none is configured
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: default_environment(),
        }
    }
}

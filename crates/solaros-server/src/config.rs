use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::{Deserialize, Serialize};
use solaros_core::{
    RateLimitConfig, ServerConfig,
    config::{DEFAULT_ENVIRONMENT, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_MS},
};
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub n8n: N8nConfig,
    pub rate_limit: RateLimitConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Create the local tables on startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_run_migrations() -> bool {
    true
}

/// n8n integration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct N8nConfig {
    /// Base URL of the n8n instance, used for health checks and outbound triggers
    pub api_url: Option<String>,
    pub webhook_secret: String,
    #[serde(default)]
    pub require_signature: bool,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. config.toml file (if present)
    /// 3. Environment variables (prefixed with SOLAROS_)
    ///
    /// Environment variables use double underscore for nesting:
    /// - SOLAROS_SERVER__PORT=3000
    /// - SOLAROS_N8N__WEBHOOK_SECRET=changeme
    pub fn load() -> Result<Self, ConfigError> {
        let builder = defaults()?;

        let builder = if Path::new("config.toml").exists() {
            builder.add_source(File::with_name("config"))
        } else {
            builder
        };

        let builder = builder.add_source(
            Environment::with_prefix("SOLAROS")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.environment", DEFAULT_ENVIRONMENT)?
        .set_default("database.url", "sqlite://solaros.db?mode=rwc")?
        .set_default("database.max_connections", 10)?
        .set_default("database.run_migrations", true)?
        .set_default("n8n.require_signature", false)?
        .set_default("rate_limit.max_requests", DEFAULT_MAX_REQUESTS as i64)?
        .set_default("rate_limit.window_ms", DEFAULT_WINDOW_MS as i64)?
        .set_default("rate_limit.enabled", false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn load_from(toml: &str) -> Result<AppConfig, ConfigError> {
        defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_with_secret() {
        let config = load_from("[n8n]\nwebhook_secret = \"s3cret\"\n").unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, "development");
        assert_eq!(config.database.max_connections, 10);
        assert!(config.database.run_migrations);
        assert_eq!(config.n8n.webhook_secret, "s3cret");
        assert!(config.n8n.api_url.is_none());
        assert!(!config.n8n.require_signature);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window_ms, 900_000);
        assert!(!config.rate_limit.enabled);
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        assert!(load_from("").is_err());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = load_from(
            r#"
            [server]
            port = 3000
            environment = "production"

            [n8n]
            api_url = "http://localhost:5678"
            webhook_secret = "s3cret"
            require_signature = true

            [rate_limit]
            max_requests = 5
            window_ms = 1000
            enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.environment, "production");
        assert_eq!(config.n8n.api_url.as_deref(), Some("http://localhost:5678"));
        assert!(config.n8n.require_signature);
        assert_eq!(config.rate_limit.max_requests, 5);
        assert!(config.rate_limit.enabled);
        assert!(config.rate_limit.validate().is_ok());
    }
}

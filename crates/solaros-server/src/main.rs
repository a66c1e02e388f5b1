mod config;

use config::AppConfig;
use solaros_api::{AppState, WebhookAuth, create_router};
use solaros_db::{Dialect, SqlDataStore, create_pool, run_migrations};
use solaros_n8n::{N8nClient, WebhookSecret};
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Install SQLite and PostgreSQL drivers for sqlx::Any
    sqlx::any::install_default_drivers();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.rate_limit.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("Configuration loaded successfully");

    let db_pool = match create_pool(&config.database.url, config.database.max_connections).await {
        Ok(pool) => {
            info!("Database connection pool created");
            pool
        }
        Err(e) => {
            error!("Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    if config.database.run_migrations {
        if let Err(e) = run_migrations(&db_pool).await {
            error!("Failed to run database migrations: {}", e);
            std::process::exit(1);
        }
        info!("Database migrations completed successfully");
    }

    let data_store = SqlDataStore::new(db_pool, Dialect::from_url(&config.database.url));

    let n8n_client = match config.n8n.api_url.clone() {
        Some(url) => match N8nClient::new(url) {
            Ok(client) => {
                info!("n8n client configured for: {}", client.api_url());
                Some(client)
            }
            Err(e) => {
                error!("Failed to create n8n client: {}", e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    if !config.n8n.require_signature {
        warn!("Unsigned webhooks are accepted; set n8n.require_signature to reject them");
    }

    let webhook_auth = WebhookAuth::new(
        WebhookSecret::new(config.n8n.webhook_secret.clone()),
        config.n8n.require_signature,
    );

    let app_state = AppState::new(
        Arc::new(data_store),
        webhook_auth,
        &config.rate_limit,
        n8n_client,
    )
    .with_environment(config.server.environment.clone());

    if config.rate_limit.enabled {
        info!(
            "Rate limiting enabled: {} requests per {} ms",
            config.rate_limit.max_requests, config.rate_limit.window_ms
        );
    }

    let app = create_router(app_state, config.rate_limit.enabled);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    // Peer addresses feed the rate limiter when no proxy headers are present
    let result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    if let Err(e) = result {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use solaros_n8n::N8nHealth;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness endpoint
///
/// Returns 200 OK with basic server info
pub async fn health() -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Outcome of a single dependency check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCheck {
    pub status: String,
    pub message: String,
}

impl ServiceCheck {
    fn healthy(message: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            message: message.into(),
        }
    }

    fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            message: message.into(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceChecks {
    pub database: ServiceCheck,
    pub n8n: ServiceCheck,
}

/// Dependency health report
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: String,
    pub services: ServiceChecks,
    pub version: String,
}

/// Dependency health endpoint
///
/// Checks the data store and n8n concurrently. Responds 200 when both are
/// healthy and 503 with status `degraded` otherwise.
pub async fn api_health(State(state): State<AppState>) -> impl IntoResponse {
    let (database, n8n) = tokio::join!(check_database(&state), check_n8n(&state));

    let all_healthy = database.is_healthy() && n8n.is_healthy();
    let report = HealthReport {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        services: ServiceChecks { database, n8n },
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let status = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

async fn check_database(state: &AppState) -> ServiceCheck {
    match state.data_store.ping().await {
        Ok(()) => ServiceCheck::healthy("Connected"),
        Err(e) => ServiceCheck::unhealthy(e.to_string()),
    }
}

async fn check_n8n(state: &AppState) -> ServiceCheck {
    let Some(client) = &state.n8n_client else {
        return ServiceCheck {
            status: "unconfigured".to_string(),
            message: "n8n.api_url is not set".to_string(),
        };
    };

    match client.health_check().await {
        N8nHealth::Healthy => ServiceCheck::healthy("healthy"),
        other => ServiceCheck::unhealthy(other.as_str()),
    }
}

/// Configuration summary of the services the gateway talks to
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusServices {
    pub api: String,
    pub database: String,
    pub n8n: String,
}

/// Service banner
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub timestamp: String,
    pub services: StatusServices,
    pub version: String,
    pub environment: String,
}

/// Report what is configured without contacting any service
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let n8n = if state.n8n_client.is_some() {
        "configured"
    } else {
        "not configured"
    };

    Json(StatusResponse {
        status: "Solar Company OS is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        services: StatusServices {
            api: "running".to_string(),
            database: "configured".to_string(),
            n8n: n8n.to_string(),
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.environment.clone(),
    })
}

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use solaros_core::CoreError;
use solaros_db::DbError;
use solaros_n8n::N8nError;
use std::fmt;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Data store call failed
    Database(DbError),

    /// Payload or configuration rejected by core logic
    Core(CoreError),

    /// Malformed request body
    InvalidPayload(String),

    /// Missing, malformed or mismatched webhook signature
    InvalidSignature(String),

    /// Caller exhausted its rate limit window
    RateLimited { retry_after_secs: u64 },

    /// Internal server error
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Database(e) => write!(f, "{}", e),
            ApiError::Core(e) => write!(f, "{}", e),
            ApiError::InvalidPayload(msg) => write!(f, "Invalid payload: {}", msg),
            ApiError::InvalidSignature(msg) => write!(f, "Invalid signature: {}", msg),
            ApiError::RateLimited { retry_after_secs } => {
                write!(f, "Rate limit exceeded, retry after {}s", retry_after_secs)
            }
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Error response JSON structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl ApiError {
    fn status_and_label(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Database(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Webhook processing failed",
                e.to_string(),
            ),
            ApiError::Core(CoreError::InvalidConfig(msg)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
                msg.clone(),
            ),
            ApiError::Core(e) => (StatusCode::BAD_REQUEST, "Invalid payload", e.to_string()),
            ApiError::InvalidPayload(msg) => {
                (StatusCode::BAD_REQUEST, "Invalid payload", msg.clone())
            }
            ApiError::InvalidSignature(msg) => {
                (StatusCode::UNAUTHORIZED, "Invalid signature", msg.clone())
            }
            ApiError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests",
                self.to_string(),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
                msg.clone(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = self.status_and_label();

        let error_response = ErrorResponse {
            success: false,
            error: error.to_string(),
            message,
        };

        let mut response = (status, Json(error_response)).into_response();
        if let ApiError::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}

// Conversions from domain errors to ApiError
impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        ApiError::Database(e)
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::Core(e)
    }
}

impl From<N8nError> for ApiError {
    fn from(e: N8nError) -> Self {
        match e {
            N8nError::InvalidSignatureFormat(_) | N8nError::VerificationFailed => {
                ApiError::InvalidSignature(e.to_string())
            }
            N8nError::HmacError(_) | N8nError::TriggerFailed { .. } | N8nError::Request(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

use crate::{
    health::{api_health, health, status},
    rate_limit::enforce_rate_limit,
    state::AppState,
    webhook_handler::handle_webhook,
};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the application router
///
/// The rate limit middleware wraps every route when `rate_limit_enabled`
/// is set.
pub fn create_router(state: AppState, rate_limit_enabled: bool) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api/health", get(api_health))
        .route("/api/status", get(status))
        .route("/webhooks/n8n", post(handle_webhook));

    let router = if rate_limit_enabled {
        router.layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            enforce_rate_limit,
        ))
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

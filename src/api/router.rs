use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::debug;
use super::health;
use super::middleware::metrics_middleware;
use super::patterns;
use super::state::AppState;
use crate::config::CorsConfig;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState, cors: &CorsConfig) -> Router {
    let mut router = Router::new()
        // Pattern endpoint, at the root for existing clients
        .route("/", post(patterns::route_pattern))
        .route("/v1/patterns", post(patterns::route_pattern))
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check));

    if state.debug_enabled {
        router = router.nest("/debug", debug::create_debug_router());
    }

    router
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}

/// CORS policy for browser clients
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-api-key"),
            HeaderName::from_static("anthropic-version"),
        ])
        .expose_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|_| warn!(origin = %origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

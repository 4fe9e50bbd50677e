//! Pattern endpoint: derive the key, serve the cached artifact or generate it

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::{CacheOutcome, DomainError, PatternRequest};
use crate::infrastructure::observability::{record_cache_lookup, record_pattern_request};

/// Reports whether the artifact came from the store (`HIT`) or was generated (`MISS`)
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

/// POST / and POST /v1/patterns
///
/// Success returns the stored generation envelope byte for byte.
pub async fn route_pattern(
    State(state): State<AppState>,
    Json(request): Json<PatternRequest>,
) -> Result<Response, ApiError> {
    debug!(
        pattern_type = request.pattern.pattern_type.as_deref().unwrap_or("<missing>"),
        has_session_token = request.session_token.is_some(),
        "Pattern request received"
    );

    match state.router.route(&request).await {
        Ok(routed) => {
            record_cache_lookup(&routed.namespace, routed.outcome.as_str());
            record_pattern_request(&routed.namespace, 200);

            Ok((
                [
                    (
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    ),
                    (
                        CACHE_STATUS_HEADER,
                        HeaderValue::from_static(routed.outcome.as_str()),
                    ),
                ],
                routed.body,
            )
                .into_response())
        }
        Err(e) => {
            let namespace = namespace_label(&state, &request);
            record_failed_lookup(namespace, &e);

            let error = ApiError::from(e);
            record_pattern_request(namespace, error.status.as_u16());
            Err(error)
        }
    }
}

/// Counts a lookup that ended in an error. Generation failures always follow a
/// miss; requests rejected before the cache is consulted are skipped.
fn record_failed_lookup(namespace: &str, error: &DomainError) {
    let outcome = match error {
        DomainError::GenerationBackend { .. } | DomainError::GenerationTransport { .. } => {
            CacheOutcome::Miss.as_str()
        }
        DomainError::Store { .. } => "ERROR",
        _ => return,
    };

    record_cache_lookup(namespace, outcome);
}

/// Metric label for a request: its namespace when registered, `unknown` otherwise
fn namespace_label<'a>(state: &'a AppState, request: &PatternRequest) -> &'a str {
    request
        .pattern
        .pattern_type
        .as_deref()
        .and_then(|t| state.router.registry().get(t))
        .map(|g| g.namespace())
        .unwrap_or("unknown")
}

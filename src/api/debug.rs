//! Read-only key introspection, mounted only when debugging is enabled

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::ListKeys;

/// Query parameters for GET /debug/keys
#[derive(Debug, Default, Deserialize)]
pub struct ListKeysQuery {
    pub cursor: Option<String>,
    pub limit: Option<usize>,
    pub prefix: Option<String>,
}

impl From<ListKeysQuery> for ListKeys {
    fn from(query: ListKeysQuery) -> Self {
        let mut params = ListKeys::new();

        if let Some(cursor) = query.cursor.filter(|c| !c.is_empty()) {
            params = params.with_cursor(cursor);
        }

        if let Some(limit) = query.limit {
            params = params.with_limit(limit);
        }

        if let Some(prefix) = query.prefix.filter(|p| !p.is_empty()) {
            params = params.with_prefix(prefix);
        }

        params
    }
}

pub fn create_debug_router() -> Router<AppState> {
    Router::new()
        .route("/keys", get(list_keys))
        .route("/keys/{key}", get(get_key))
}

/// GET /debug/keys
pub async fn list_keys(
    State(state): State<AppState>,
    Query(query): Query<ListKeysQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.store.list_keys(&query.into()).await?;
    Ok(Json(page))
}

/// GET /debug/keys/{key}
pub async fn get_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    match state.store.get(&key).await? {
        Some(value) => Ok(([(header::CONTENT_TYPE, "application/json")], value).into_response()),
        None => Err(ApiError::not_found(format!("Key not found: {}", key))),
    }
}

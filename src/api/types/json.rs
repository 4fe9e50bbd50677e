//! JSON extractor that reports bad bodies as malformed patterns

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::domain::DomainError;

/// JSON extractor that does not require a `Content-Type` header.
///
/// Any failure to read or decode the body is rejected with a 400
/// `{ "error": ... }` response.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            ApiError::from(DomainError::malformed_pattern(format!(
                "Failed to read request body: {}",
                e.body_text()
            )))
        })?;

        serde_json::from_slice(&bytes)
            .map(Json)
            .map_err(|e| ApiError::from(DomainError::malformed_pattern(e.to_string())))
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepts_body_without_content_type() {
        let Json(value) = Json::<Named>::from_request(request(r#"{"name":"cairn"}"#), &())
            .await
            .unwrap();

        assert_eq!(value.name, "cairn");
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let rejection = Json::<Named>::from_request(request("{not json"), &())
            .await
            .unwrap_err();

        assert_eq!(rejection.status, StatusCode::BAD_REQUEST);
        assert!(rejection.message().starts_with("Malformed pattern:"));
    }

    #[test]
    fn test_json_into_inner() {
        let json = Json(42);
        assert_eq!(json.into_inner(), 42);
    }
}

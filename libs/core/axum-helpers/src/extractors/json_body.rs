//! JSON body extractor that ignores `Content-Type`.

use crate::errors::error_response;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use std::fmt;

/// Message returned when the body cannot be decoded.
pub const INVALID_BODY: &str = "invalid request body";

/// Decodes the request body as JSON whatever the `Content-Type` header says.
///
/// An empty body decodes as `{}`, so DTOs whose fields all have defaults
/// still extract. Anything else that fails to decode is rejected with
/// [`JsonBodyRejection`].
///
/// Take `Result<JsonBody<T>, JsonBodyRejection>` to decide in the handler
/// when a bad body should be reported.
///
/// ```ignore
/// use axum_helpers::extractors::JsonBody;
///
/// async fn create(JsonBody(draft): JsonBody<NewProduct>) -> StatusCode {
///     StatusCode::CREATED
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

/// Body could not be read or decoded. Responds 400 `{"error": "invalid request body"}`.
#[derive(Debug)]
pub struct JsonBodyRejection {
    detail: String,
}

impl JsonBodyRejection {
    /// Decoder message, for logs only
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for JsonBodyRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", INVALID_BODY, self.detail)
    }
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        tracing::info!("Rejected request body: {}", self.detail);
        error_response(StatusCode::BAD_REQUEST, INVALID_BODY)
    }
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| JsonBodyRejection {
                detail: e.body_text(),
            })?;

        decode(&bytes).map(JsonBody).map_err(|e| JsonBodyRejection {
            detail: e.to_string(),
        })
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice(b"{}")
    } else {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Draft {
        name: String,
        price: f64,
    }

    async fn extract(body: &'static str) -> Result<JsonBody<Draft>, JsonBodyRejection> {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap();
        JsonBody::<Draft>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_decodes_without_content_type() {
        let JsonBody(draft) = extract(r#"{"name":"milk","price":1.5}"#).await.unwrap();
        assert_eq!(draft.name, "milk");
        assert_eq!(draft.price, 1.5);
    }

    #[tokio::test]
    async fn test_empty_body_uses_defaults() {
        let JsonBody(draft) = extract("").await.unwrap();
        assert_eq!(draft, Draft::default());
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let rejection = extract("{not json").await.unwrap_err();
        assert!(!rejection.detail().is_empty());

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], INVALID_BODY);
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_rejected() {
        let rejection = extract(r#"{"price":"cheap"}"#).await.unwrap_err();
        assert!(rejection.to_string().starts_with(INVALID_BODY));
    }
}

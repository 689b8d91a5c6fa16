use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::{JsonBodyRejection, error_response};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use validator::ValidationErrors;

pub const PRODUCT_NOT_AVAILABLE: &str = "product is not available";
pub const INVALID_CATEGORY: &str = "invalid category";
pub const NAME_ALREADY_EXISTS: &str = "name already exists";
pub const INTERNAL_SERVER_ERROR: &str = "internal server error";

/// Validation codes in the order they are reported.
const VALIDATION_ORDER: [&str; 3] = ["name", "price", "category"];

#[derive(Debug, Error)]
pub enum ProductError {
    /// Message is returned to the client as-is
    #[error("{0}")]
    Validation(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Path segment that matched no product, numeric or not
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("No products matched the query")]
    NoProducts,

    /// Offending name, or the store's constraint detail
    #[error("Product name already exists: {0}")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProductError::Validation(_)
            | ProductError::InvalidBody(_)
            | ProductError::DuplicateName(_) => StatusCode::BAD_REQUEST,
            ProductError::NotFound(_) | ProductError::NoProducts => StatusCode::NOT_FOUND,
            ProductError::Database(_) | ProductError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text of the `error` field in the response body
    pub fn client_message(&self) -> &str {
        match self {
            ProductError::Validation(msg) => msg,
            ProductError::InvalidBody(_) => axum_helpers::extractors::json_body::INVALID_BODY,
            ProductError::NotFound(_) => PRODUCT_NOT_AVAILABLE,
            ProductError::NoProducts => INVALID_CATEGORY,
            ProductError::DuplicateName(_) => NAME_ALREADY_EXISTS,
            ProductError::Database(_) | ProductError::Internal(_) => INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        } else {
            tracing::info!(status = status.as_u16(), "{}", self);
        }

        error_response(status, self.client_message())
    }
}

impl From<DbErr> for ProductError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => ProductError::DuplicateName(detail),
            _ => ProductError::Database(err.to_string()),
        }
    }
}

/// Keeps only the first failed rule, in name, price, category order.
impl From<ValidationErrors> for ProductError {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let failed: Vec<_> = field_errors.values().flat_map(|errs| errs.iter()).collect();

        VALIDATION_ORDER
            .iter()
            .find_map(|code| failed.iter().find(|e| e.code == *code))
            .and_then(|e| e.message.as_ref())
            .map(|msg| ProductError::Validation(msg.to_string()))
            .unwrap_or_else(|| ProductError::Validation(errors.to_string()))
    }
}

impl From<JsonBodyRejection> for ProductError {
    fn from(rejection: JsonBodyRejection) -> Self {
        ProductError::InvalidBody(rejection.detail().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::ValidationError;

    async fn body_of(err: ProductError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_client_messages_hide_internal_details() {
        let (status, body) = body_of(ProductError::Database("relation missing".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "internal server error" }));

        let (status, body) = body_of(ProductError::DuplicateName("products_name_key".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name already exists");
    }

    #[tokio::test]
    async fn test_not_found_and_empty_list_bodies() {
        let (status, body) = body_of(ProductError::NotFound("abc".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "product is not available");

        let (status, body) = body_of(ProductError::NoProducts).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "invalid category");
    }

    #[test]
    fn test_plain_db_error_maps_to_database() {
        let err: ProductError = DbErr::Custom("connection reset".into()).into();
        assert!(matches!(err, ProductError::Database(msg) if msg.contains("connection reset")));
    }

    #[test]
    fn test_validation_keeps_first_rule_in_order() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "category_id",
            ValidationError::new("category").with_message("category is missing".into()),
        );
        errors.add(
            "price",
            ValidationError::new("price").with_message("price is missing or invalid".into()),
        );

        let err: ProductError = errors.into();
        assert!(matches!(err, ProductError::Validation(msg) if msg == "price is missing or invalid"));
    }
}

use axum::{http::StatusCode, response::Response};

use super::error_response;

/// Router fallback for unmatched paths.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "not found")
}

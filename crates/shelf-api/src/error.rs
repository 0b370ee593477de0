//! # API Error Mapping
//!
//! `ShelfError` carries its own HTTP status; this module wraps it in an
//! axum-compatible rejection and the JSON error body every endpoint shares.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shelf_core::ShelfError;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Axum-side wrapper turning a `ShelfError` into a response
#[derive(Debug)]
pub struct ApiError(pub ShelfError);

impl From<ShelfError> for ApiError {
    fn from(err: ShelfError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.status_code();
        let status =
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.0.to_string(),
            code,
            details: None,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for all handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let response = ApiError(ShelfError::Forbidden("not admin".into())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = ApiError(ShelfError::Validation("bad price".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

//! Error types for tunedin-rec
//!
//! [`RecommendError`] is the pipeline boundary; [`ApiError`] maps it (and
//! request validation failures) to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Recommendation pipeline errors
///
/// Only failures that make every further catalog call pointless surface here;
/// empty or failed searches fall through the tier ladder instead.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// Catalog credentials missing, rejected or unobtainable
    #[error("Catalog authorization failed: {0}")]
    Auth(String),

    /// Whole-request deadline exceeded
    #[error("Recommendation timed out after {0}s")]
    Timeout(u64),

    /// Unusable request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Nothing matched (404), optionally with a page to search by hand
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        search_url: Option<String>,
    },

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upstream catalog failure (502)
    #[error("Upstream error: {0}")]
    BadGateway(String),

    /// Request deadline exceeded (504)
    #[error("Timed out: {0}")]
    GatewayTimeout(String),
}

impl From<RecommendError> for ApiError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::Auth(_) => ApiError::BadGateway(err.to_string()),
            RecommendError::Timeout(_) => ApiError::GatewayTimeout(err.to_string()),
            RecommendError::InvalidInput(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, search_url) = match self {
            ApiError::NotFound { message, search_url } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", message, search_url)
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg, None),
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", msg, None),
        };

        let mut error = json!({
            "code": error_code,
            "message": message,
        });
        if let Some(url) = search_url {
            error["search_url"] = json!(url);
        }
        let body = Json(json!({ "error": error }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

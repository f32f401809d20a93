//! Service-level handlers

use crate::{ApiError, ErrorCode};
use axum::{http::StatusCode, response::IntoResponse};

/// GET /health - Health check
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::new(ErrorCode::NotFound, "Not found")
}

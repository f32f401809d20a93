//! HTTP middleware for authentication, request ids and logging

use crate::auth::{extract_bearer_token, TokenError};
use crate::{ApiError, AppState};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Authentication middleware
///
/// Verifies the bearer token and stores the resulting
/// [`AuthenticatedSession`](crate::AuthenticatedSession) in the request
/// extensions. Requests without a valid token never reach the handler.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => extract_bearer_token(header).ok_or(TokenError::MalformedHeader)?,
        None => return Err(TokenError::Missing.into()),
    };

    let session = state.tokens.decode_session(token).map_err(|e| {
        tracing::debug!(error = %e, "Session token rejected");
        e
    })?;

    tracing::debug!(user = %session.user, "Request authenticated");
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Id of the request being served, if called inside [`request_id_middleware`]
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}

/// Caller-supplied ids are kept when short and header-safe
fn inbound_request_id(request: &Request<Body>) -> Option<String> {
    let value = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let valid = (1..=64).contains(&value.len())
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
    valid.then(|| value.to_string())
}

/// Request ID middleware - one id per request, echoed in x-request-id
pub async fn request_id_middleware(request: Request<Body>, next: Next) -> Response {
    let request_id = inbound_request_id(&request).unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let mut response = REQUEST_ID.scope(request_id.clone(), next.run(request)).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        path = %path,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}

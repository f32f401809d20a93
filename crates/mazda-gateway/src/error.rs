//! Error types and the HTTP error taxonomy

use crate::auth::TokenError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use mazda_client::ClientError;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-field validation messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Machine-readable error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ValidationError,
    TokenInvalid,
    AuthenticationError,
    BackendOperationError,
    NotFound,
    InternalError,
}

impl ErrorCode {
    /// Get the error code string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "ValidationError",
            Self::TokenInvalid => "TokenInvalid",
            Self::AuthenticationError => "AuthenticationError",
            Self::BackendOperationError => "BackendOperationError",
            Self::NotFound => "NotFound",
            Self::InternalError => "InternalError",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            Self::TokenInvalid | Self::AuthenticationError => StatusCode::UNAUTHORIZED,
            Self::BackendOperationError => StatusCode::BAD_GATEWAY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Gateway {
        code: ErrorCode,
        message: String,
        detail: Option<String>,
    },

    #[error("{message}")]
    Validation { message: String, fields: FieldErrors },

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Gateway {
            code,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(code: ErrorCode, message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Gateway {
            code,
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    /// Request payload rejected before any field could be checked
    pub fn malformed_body(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    /// Vehicle cloud refused the credentials while issuing a token
    pub fn authentication(err: &ClientError) -> Self {
        Self::with_detail(ErrorCode::AuthenticationError, "Authentication error", err.to_string())
    }

    /// Map a failed backend call on an authenticated route
    pub fn backend(err: ClientError) -> Self {
        if err.is_credential_failure() {
            Self::authentication(&err)
        } else {
            Self::with_detail(
                ErrorCode::BackendOperationError,
                "Vehicle cloud request failed",
                err.to_string(),
            )
        }
    }

    /// Get the error code
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Gateway { code, .. } => *code,
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::Token(TokenError::Encode(_)) | Self::Token(TokenError::Config(_)) => ErrorCode::InternalError,
            Self::Token(_) => ErrorCode::TokenInvalid,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        Self::backend(err)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
    request_id: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let status = code.status_code();
        let request_id = crate::middleware::current_request_id()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        if status.is_server_error() {
            tracing::error!(error = %self, request_id = %request_id, "Request failed");
        }

        // Internal details stay in the log
        let message = match &self {
            Self::Internal(_) | Self::Token(TokenError::Encode(_)) | Self::Token(TokenError::Config(_)) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let (detail, fields) = match &self {
            Self::Gateway { detail, .. } => (detail.as_deref(), None),
            Self::Validation { fields, .. } if !fields.is_empty() => (None, Some(fields)),
            _ => (None, None),
        };

        let body = ErrorBody {
            error: code.as_str(),
            message,
            detail,
            fields,
            request_id: &request_id,
        };
        let mut response = (status, Json(&body)).into_response();

        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            headers.insert(crate::middleware::REQUEST_ID_HEADER, value);
        }
        if code == ErrorCode::TokenInvalid {
            let challenge = match &self {
                Self::Token(TokenError::Missing) => "Bearer",
                _ => "Bearer error=\"invalid_token\"",
            };
            headers.insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
        }

        response
    }
}

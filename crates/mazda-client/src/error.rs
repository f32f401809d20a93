//! Client error types

use serde::Deserialize;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Vehicle-cloud client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Credentials rejected by the vehicle cloud
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Account locked after too many failed logins
    #[error("Account locked: {0}")]
    AccountLocked(String),

    /// Vehicle-cloud session token expired
    #[error("Token expired: {0}")]
    TokenExpired(String),

    /// Login failed for a reason other than bad credentials
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Payload encryption or decryption failed upstream
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Vehicle-cloud API error
    #[error("API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Invalid response
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Operation attempted after `close`
    #[error("Client already closed")]
    Closed,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl ClientError {
    /// Build an error from a non-success vehicle-cloud response
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let code = parsed.as_ref().and_then(|b| b.code.clone());
        let message = parsed
            .and_then(|b| b.message)
            .unwrap_or_else(|| format!("HTTP {}", status));

        match code.as_deref() {
            Some("AuthenticationError") => Self::Authentication(message),
            Some("AccountLocked") => Self::AccountLocked(message),
            Some("TokenExpired") => Self::TokenExpired(message),
            Some("LoginFailed") => Self::LoginFailed(message),
            Some("EncryptionError") => Self::Encryption(message),
            None if status == 401 => Self::Authentication(message),
            _ => Self::Api {
                status,
                code: code.unwrap_or_else(|| format!("HTTP{}", status)),
                message,
            },
        }
    }

    /// Whether the vehicle cloud refused the credentials themselves
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            Self::Authentication(_) | Self::AccountLocked(_) | Self::TokenExpired(_) | Self::LoginFailed(_)
        )
    }
}

/// Region code outside the supported set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown region: {0}")]
pub struct UnknownRegion(pub String);

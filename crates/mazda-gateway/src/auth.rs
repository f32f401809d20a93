//! Session token encoding and verification
//!
//! Tokens are HS256 JWTs whose claims carry the account credentials. They are
//! signed, not encrypted: anyone holding a token can read the password, so
//! tokens must only travel over trusted transport.

use crate::state::AuthenticatedSession;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mazda_client::{Credentials, Region};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Clock skew tolerated when checking `exp`
const EXPIRY_LEEWAY_SECS: u64 = 60;

/// Longest accepted token lifetime (10 years)
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 366 * 24 * 60 * 60;

/// Session token errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Authentication required")]
    Missing,

    #[error("Invalid Authorization header format")]
    MalformedHeader,

    #[error("Session token has expired")]
    Expired,

    #[error("Invalid session token signature")]
    InvalidSignature,

    #[error("Invalid session token: {0}")]
    Invalid(String),

    #[error("Failed to sign session token: {0}")]
    Encode(String),

    #[error("Token configuration error: {0}")]
    Config(String),
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub password: String,
    pub region: Region,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Signs and verifies session tokens with the process-wide secret
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec; `ttl` of `None` issues tokens without expiry
    pub fn new(secret: &str, ttl: Option<Duration>) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Config("secret key must not be empty".to_string()));
        }
        if let Some(ttl) = ttl.filter(|ttl| ttl.as_secs() > MAX_TOKEN_TTL_SECS) {
            return Err(TokenError::Config(format!(
                "token lifetime of {}s exceeds the {}s maximum",
                ttl.as_secs(),
                MAX_TOKEN_TTL_SECS
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = EXPIRY_LEEWAY_SECS;
        validation.validate_exp = true;
        if ttl.is_none() {
            // exp is still checked when present, just not demanded
            validation.required_spec_claims.clear();
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Sign a credential set into a session token
    pub fn encode(&self, credentials: &Credentials) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let exp = match self.ttl {
            Some(ttl) => Some(
                i64::try_from(ttl.as_secs())
                    .ok()
                    .and_then(|secs| now.checked_add(secs))
                    .ok_or_else(|| TokenError::Encode("token expiry out of range".to_string()))?,
            ),
            None => None,
        };
        let claims = Claims {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
            region: credentials.region,
            iat: now,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Verify a token and recover the credential set it carries
    pub fn decode(&self, token: &str) -> Result<Credentials, TokenError> {
        self.decode_claims(token).map(claims_to_credentials)
    }

    /// Verify a token and build the request session from it
    pub fn decode_session(&self, token: &str) -> Result<AuthenticatedSession, TokenError> {
        let claims = self.decode_claims(token)?;
        let expires_at = claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0));
        Ok(AuthenticatedSession::new(claims_to_credentials(claims), expires_at))
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Invalid(e.to_string()),
            })?;

        if claims.email.is_empty() || claims.password.is_empty() {
            return Err(TokenError::Invalid("empty credentials".to_string()));
        }
        Ok(claims)
    }
}

fn claims_to_credentials(claims: Claims) -> Credentials {
    Credentials {
        email: claims.email,
        password: claims.password,
        region: claims.region,
    }
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

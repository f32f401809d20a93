//! Application state

use crate::auth::TokenCodec;
use crate::config::GatewayConfig;
use crate::dispatch::{BackendConnector, Connector};
use chrono::{DateTime, Utc};
use mazda_client::Credentials;
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Session token codec
    pub tokens: TokenCodec,
    /// Builds one backend client per request
    pub connector: Arc<dyn Connector>,
}

impl AppState {
    /// Create a new application state with the built-in backends
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let connector = Arc::new(BackendConnector::new(config.client_config()));
        Self::with_connector(config, connector)
    }

    /// Create a new application state with a custom backend connector
    pub fn with_connector(config: GatewayConfig, connector: Arc<dyn Connector>) -> anyhow::Result<Self> {
        let tokens = TokenCodec::new(&config.secret_key, config.token_ttl())?;

        match tokens.ttl() {
            Some(ttl) => info!("Session tokens expire after {}s", ttl.as_secs()),
            None => warn!("⚠ Session tokens never expire - a leaked token stays valid until the secret key rotates"),
        }

        if config.use_stand_in {
            warn!("⚠ Backend mode: stand-in (no requests reach the vehicle cloud)");
        } else if let Some(url) = &config.backend_url {
            info!("✓ Backend mode: live ({})", url);
        } else {
            warn!("⚠ Backend mode: live, but no vehicle-cloud endpoint is configured");
        }

        Ok(Self {
            config,
            tokens,
            connector,
        })
    }
}

/// Identity attached to a request by the auth gate
#[derive(Clone, Debug)]
pub struct AuthenticatedSession {
    /// Credentials recovered from the bearer token
    pub credentials: Credentials,
    /// Anonymised user id for logs
    pub user: String,
    /// Token expiry, if the token carries one
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthenticatedSession {
    pub fn new(credentials: Credentials, expires_at: Option<DateTime<Utc>>) -> Self {
        let user = credentials.fingerprint();
        Self {
            credentials,
            user,
            expires_at,
        }
    }
}

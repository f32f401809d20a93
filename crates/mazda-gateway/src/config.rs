//! Gateway configuration

use mazda_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gateway server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Path prefix for every route
    pub api_prefix: String,
    /// Secret key signing session tokens
    #[serde(skip_serializing)]
    pub secret_key: String,
    /// Serve every request from the stand-in backend
    pub use_stand_in: bool,
    /// Vehicle-cloud bridge endpoint for the live backend
    pub backend_url: Option<String>,
    /// Live backend request timeout (seconds)
    pub backend_timeout_secs: u64,
    /// Session token lifetime (seconds), 0 for tokens that never expire
    pub token_ttl_secs: u64,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    /// Enable CORS
    pub cors_enabled: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            api_prefix: "/api".to_string(),
            secret_key: String::new(),
            use_stand_in: false,
            backend_url: None,
            backend_timeout_secs: 30,
            token_ttl_secs: 7 * 24 * 60 * 60, // 7 days
            max_body_size: 64 * 1024,
            cors_enabled: true,
        }
    }
}

impl GatewayConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Session token lifetime, `None` when expiry is disabled
    pub fn token_ttl(&self) -> Option<Duration> {
        (self.token_ttl_secs > 0).then(|| Duration::from_secs(self.token_ttl_secs))
    }

    /// Prefix normalized to `/segment` form, empty for the root
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }

    /// Configuration handed to the live backend
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.backend_url.clone(),
            timeout: Duration::from_secs(self.backend_timeout_secs),
            ..Default::default()
        }
    }
}

//! Client configuration

use crate::{ClientError, Result};
use std::time::Duration;
use url::Url;

/// Live backend configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Vehicle-cloud bridge endpoint URL
    pub endpoint: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("mazda-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new config with the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Default::default()
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validated base URL for API requests, without a trailing slash
    pub fn base_url(&self) -> Result<String> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| ClientError::Config("no vehicle-cloud endpoint configured".to_string()))?;

        let url = Url::parse(endpoint)
            .map_err(|e| ClientError::Config(format!("invalid endpoint {}: {}", endpoint, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(endpoint.trim_end_matches('/').to_string()),
            other => Err(ClientError::Config(format!("unsupported endpoint scheme: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = ClientConfig::new("https://bridge.example.com/v1/");
        assert_eq!(config.base_url().unwrap(), "https://bridge.example.com/v1");
    }

    #[test]
    fn test_missing_endpoint_is_config_error() {
        let err = ClientConfig::default().base_url().unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = ClientConfig::new("ftp://bridge.example.com").base_url().unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}

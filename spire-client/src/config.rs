//! Client configuration

use crate::error::SpireResult;
use crate::http::NetworkHttpClient;

/// Default API root when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:10880/api/v2";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for connecting to the API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root (e.g., "https://erp.example.com:10880/api/v2/companies/acme")
    pub base_url: String,

    /// Bearer token sent with every request
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read configuration from the environment
    ///
    /// - `SPIRE_BASE_URL` (default [`DEFAULT_BASE_URL`])
    /// - `SPIRE_TOKEN` (optional)
    /// - `SPIRE_TIMEOUT_SECS` (default [`DEFAULT_TIMEOUT_SECS`])
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("SPIRE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            token: std::env::var("SPIRE_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout: std::env::var("SPIRE_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> SpireResult<NetworkHttpClient> {
        NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("https://erp.example.com/api/v2")
            .with_token("secret")
            .with_timeout(5);

        assert_eq!(config.base_url, "https://erp.example.com/api/v2");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, 5);
    }

    #[test]
    fn test_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.token.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT_SECS);
    }
}

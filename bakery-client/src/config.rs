//! Client configuration

use std::path::PathBuf;

/// Default API server (the storefront dev server)
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Client configuration for connecting to the bakery server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory holding the cart snapshot and the session token
    pub data_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 10,
            data_dir: None,
        }
    }

    /// Read `BAKERY_API_URL` / `BAKERY_DATA_DIR`, falling back to defaults
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("BAKERY_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url);
        if let Ok(dir) = std::env::var("BAKERY_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the local state directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// `{base}/api/{path}`
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
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
    fn test_api_url_joins_cleanly() {
        let config = ClientConfig::new("http://bakery.test/");
        assert_eq!(config.api_url("/cakes"), "http://bakery.test/api/cakes");
        assert_eq!(config.api_url("orders"), "http://bakery.test/api/orders");
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, 10);
        assert!(config.data_dir.is_none());
    }
}

//! Client configuration.
//!
//! The backend base address is the only externally-configurable value; it is
//! injected explicitly at construction rather than read from a module-level
//! constant, so every component can be pointed at a different deployment.

use std::time::Duration;

use url::Url;

use crate::error::{CatalogError, Result};

/// Default backend address used by the development deployment.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default transport timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the catalog HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    /// Request timeout applied at the transport layer.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the given backend base URL.
    ///
    /// The URL is validated eagerly; a trailing slash is added to the path if
    /// missing so endpoint paths join predictably.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url).map_err(|e| {
            CatalogError::Validation(format!("invalid base URL '{base_url}': {e}"))
        })?;

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base_url: base,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Optional: `PIXFIND_API_URL` (defaults to the development deployment),
    /// `PIXFIND_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("PIXFIND_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("PIXFIND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self::new(&base_url)?.with_timeout(Duration::from_secs(timeout_secs)))
    }

    /// Override the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The validated backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /search/` endpoint.
    pub fn search_url(&self) -> String {
        self.join("search/")
    }

    /// `GET /products/{item_id}` endpoint.
    pub fn product_url(&self, item_id: &str) -> String {
        self.join(&format!("products/{item_id}"))
    }

    /// `POST /add_product` endpoint.
    pub fn add_product_url(&self) -> String {
        self.join("add_product")
    }

    /// `GET /images/{image_path}` endpoint. The stored path may contain
    /// subdirectories ("new/ABC123.jpg"); they are preserved as-is.
    pub fn image_url(&self, image_path: &str) -> String {
        self.join(&format!("images/{image_path}"))
    }

    fn join(&self, path: &str) -> String {
        self.base_url
            .join(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("{}{}", self.base_url, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_default_base() {
        let config = ClientConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(config.search_url(), "http://localhost:5000/search/");
        assert_eq!(
            config.product_url("B07ABC1234"),
            "http://localhost:5000/products/B07ABC1234"
        );
        assert_eq!(
            config.add_product_url(),
            "http://localhost:5000/add_product"
        );
        assert_eq!(
            config.image_url("new/XYZ9876.jpg"),
            "http://localhost:5000/images/new/XYZ9876.jpg"
        );
    }

    #[test]
    fn test_base_url_without_trailing_slash() {
        let config = ClientConfig::new("http://api.example.com/catalog").unwrap();
        assert_eq!(
            config.search_url(),
            "http://api.example.com/catalog/search/"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(ClientConfig::new("not a url").is_err());
    }

    #[test]
    fn test_default_timeout() {
        let config = ClientConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}

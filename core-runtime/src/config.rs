//! # Core Configuration Module
//!
//! Provides configuration management for the storefront client core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `StorefrontConfig` instance that holds all necessary dependencies and
//! settings for the core. It enforces fail-fast validation to ensure all
//! required bridges are provided before initialization.
//!
//! ## Required Dependencies
//!
//! - `SecureStore` - Required for credential persistence
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP transport (desktop default: reqwest)
//!
//! When the `desktop-shims` feature is enabled, desktop-ready defaults are
//! injected automatically if not provided.
//!
//! ## Usage
//!
//! ### Basic Configuration with Desktop Defaults
//!
//! ```ignore
//! use core_runtime::config::StorefrontConfig;
//!
//! let config = StorefrontConfig::builder()
//!     .api_base_url("https://shop.example.com/api/")
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ### Configuration with Custom Bridges
//!
//! ```ignore
//! use core_runtime::config::StorefrontConfig;
//! use std::sync::Arc;
//!
//! // Note: Requires implementing HttpClient and SecureStore
//! let config = StorefrontConfig::builder()
//!     .api_base_url("https://shop.example.com/api/")
//!     .request_timeout(std::time::Duration::from_secs(20))
//!     .http_client(Arc::new(MyHttpClient))
//!     .secure_store(Arc::new(MySecureStore))
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! The builder validates all required dependencies and provides actionable
//! error messages when capabilities are missing.

use crate::error::{Error, Result};
use bridge_traits::{HttpClient, SecureStore};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the storefront client core.
///
/// This struct holds all dependencies and settings required to initialize
/// the core. Use [`StorefrontConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Base URL of the storefront REST API, normalized with a trailing slash
    pub api_base_url: String,

    /// Default timeout applied to outgoing requests
    pub request_timeout: Duration,

    /// User agent string sent with every request
    pub user_agent: String,

    /// HTTP transport for API requests (optional with desktop default)
    pub http_client: Option<Arc<dyn HttpClient>>,

    /// Secure credential storage (required)
    pub secure_store: Arc<dyn SecureStore>,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .field("secure_store", &"SecureStore { ... }")
            .finish()
    }
}

impl StorefrontConfig {
    /// Creates a new builder for constructing a `StorefrontConfig`.
    pub fn builder() -> StorefrontConfigBuilder {
        StorefrontConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - API base URL is non-empty and uses an http(s) scheme
    /// - Request timeout is non-zero
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "API base URL must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Option<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    Some(Arc::new(ReqwestHttpClient::with_timeout(timeout)))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Option<Arc<dyn HttpClient>> {
    None
}

#[cfg(feature = "desktop-shims")]
fn provide_default_secure_store() -> Result<Arc<dyn SecureStore>> {
    use bridge_desktop::KeyringSecureStore;

    let store: Arc<dyn SecureStore> = Arc::new(KeyringSecureStore::new());
    Ok(store)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_secure_store() -> Result<Arc<dyn SecureStore>> {
    Err(Error::CapabilityMissing {
        capability: "SecureStore".to_string(),
        message: "SecureStore implementation is required for credential persistence. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default KeyringSecureStore. \
                 Mobile: inject platform-native secure storage (Keychain/Keystore)."
            .to_string(),
    })
}

/// Builder for [`StorefrontConfig`].
#[derive(Default)]
pub struct StorefrontConfigBuilder {
    api_base_url: Option<String>,
    request_timeout: Option<Duration>,
    user_agent: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    secure_store: Option<Arc<dyn SecureStore>>,
}

impl StorefrontConfigBuilder {
    /// Sets the storefront API base URL (required).
    ///
    /// A trailing slash is appended if missing so relative paths join
    /// predictably.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.is_empty() && !url.ends_with('/') {
            url.push('/');
        }
        self.api_base_url = Some(url);
        self
    }

    /// Sets the default request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) is used when the
    /// `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the secure store implementation (required).
    ///
    /// The secure store is used for persisting the session credentials. It
    /// must provide platform-appropriate security (Keychain on macOS/iOS,
    /// Keystore on Android, etc.).
    pub fn secure_store(mut self, store: Arc<dyn SecureStore>) -> Self {
        self.secure_store = Some(store);
        self
    }

    /// Builds the configuration, injecting desktop defaults where enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API base URL is missing or invalid
    /// - No `SecureStore` is available
    pub fn build(self) -> Result<StorefrontConfig> {
        let api_base_url = self.api_base_url.ok_or_else(|| {
            Error::Config("API base URL is required. Use .api_base_url() to set it.".to_string())
        })?;

        let secure_store = match self.secure_store {
            Some(store) => store,
            None => provide_default_secure_store()?,
        };

        let request_timeout = self.request_timeout.unwrap_or(Duration::from_secs(30));
        let http_client = self
            .http_client
            .or_else(|| provide_default_http_client(request_timeout));

        let config = StorefrontConfig {
            api_base_url,
            request_timeout,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| "storefront-core/0.1.0".to_string()),
            http_client,
            secure_store,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::BridgeError;

    struct MockSecureStore;

    #[async_trait]
    impl SecureStore for MockSecureStore {
        async fn set_secret(
            &self,
            _key: &str,
            _value: &[u8],
        ) -> std::result::Result<(), BridgeError> {
            Ok(())
        }

        async fn get_secret(
            &self,
            _key: &str,
        ) -> std::result::Result<Option<Vec<u8>>, BridgeError> {
            Ok(None)
        }

        async fn delete_secret(&self, _key: &str) -> std::result::Result<(), BridgeError> {
            Ok(())
        }

        async fn list_keys(&self) -> std::result::Result<Vec<String>, BridgeError> {
            Ok(Vec::new())
        }

        async fn clear_all(&self) -> std::result::Result<(), BridgeError> {
            Ok(())
        }
    }

    #[test]
    fn build_with_required_fields() {
        let config = StorefrontConfig::builder()
            .api_base_url("https://shop.example.com/api")
            .secure_store(Arc::new(MockSecureStore))
            .build()
            .unwrap();

        assert_eq!(config.api_base_url, "https://shop.example.com/api/");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn build_without_base_url_fails() {
        let result = StorefrontConfig::builder()
            .secure_store(Arc::new(MockSecureStore))
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn build_rejects_non_http_url() {
        let result = StorefrontConfig::builder()
            .api_base_url("ftp://shop.example.com/")
            .secure_store(Arc::new(MockSecureStore))
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn build_rejects_zero_timeout() {
        let result = StorefrontConfig::builder()
            .api_base_url("https://shop.example.com/")
            .request_timeout(Duration::ZERO)
            .secure_store(Arc::new(MockSecureStore))
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }
}

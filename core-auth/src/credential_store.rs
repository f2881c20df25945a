//! Secure Credential Storage
//!
//! This module provides secure persistence for the session credential pair
//! using platform-specific secure storage mechanisms (Keychain, Keystore, etc.).
//!
//! ## Security Features
//!
//! - Token values are never logged or exposed in error messages
//! - Storage uses platform-specific secure stores (via the `SecureStore` trait)
//! - Corrupted entries are deleted on read instead of poisoning the session
//! - Audit logging without exposing sensitive data
//!
//! ## Example
//!
//! ```no_run
//! use core_auth::{AuthTokens, CredentialStore};
//! use std::sync::Arc;
//! # use bridge_traits::storage::SecureStore;
//! # async fn example(secure_store: Arc<dyn SecureStore>) -> core_auth::Result<()> {
//! let credentials = CredentialStore::new(secure_store);
//!
//! // Store a fresh credential pair
//! let tokens = AuthTokens::new("access_value".into(), Some("refresh_value".into()));
//! credentials.store_tokens(&tokens).await?;
//!
//! // Read the access token back
//! let access = credentials.access_token().await?;
//!
//! // Drop the session
//! credentials.clear().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::AuthTokens;
use bridge_traits::storage::SecureStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Secure storage for the session credential pair.
///
/// The two credentials are stored under independent keys so a refresh can
/// rotate the access token without touching the refresh token. The store is
/// the single source of truth for the session: the gateway reads through to
/// it on every request and the refresh path writes back through it.
#[derive(Clone)]
pub struct CredentialStore {
    secure_store: Arc<dyn SecureStore>,
}

impl CredentialStore {
    /// Create a new credential store
    ///
    /// # Arguments
    ///
    /// * `secure_store` - Platform-specific secure storage implementation
    pub fn new(secure_store: Arc<dyn SecureStore>) -> Self {
        debug!("Initializing CredentialStore");
        Self { secure_store }
    }

    /// Read the stored access token.
    ///
    /// Returns `Ok(None)` if no token is stored. A non-UTF-8 entry is
    /// treated as corruption: it is deleted and `Ok(None)` is returned.
    pub async fn access_token(&self) -> Result<Option<String>> {
        self.read_token(ACCESS_TOKEN_KEY).await
    }

    /// Read the stored refresh token.
    ///
    /// Returns `Ok(None)` if no token is stored.
    pub async fn refresh_token(&self) -> Result<Option<String>> {
        self.read_token(REFRESH_TOKEN_KEY).await
    }

    /// Store a credential pair.
    ///
    /// The refresh token is only overwritten when the pair carries one;
    /// refresh responses that omit a rotated refresh token keep the
    /// existing one valid.
    pub async fn store_tokens(&self, tokens: &AuthTokens) -> Result<()> {
        self.write_token(ACCESS_TOKEN_KEY, tokens.access_token())
            .await?;

        if let Some(refresh) = tokens.refresh_token() {
            self.write_token(REFRESH_TOKEN_KEY, refresh).await?;
        }

        info!(
            rotated_refresh_token = tokens.refresh_token().is_some(),
            "Credentials stored securely"
        );

        Ok(())
    }

    /// Overwrite only the access token.
    pub async fn set_access_token(&self, access: &str) -> Result<()> {
        self.write_token(ACCESS_TOKEN_KEY, access).await?;
        debug!("Access token updated");
        Ok(())
    }

    /// Check whether an access token is currently stored.
    pub async fn has_session(&self) -> Result<bool> {
        self.secure_store
            .has_secret(ACCESS_TOKEN_KEY)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to check session in secure storage");
                AuthError::SecureStorageUnavailable(e.to_string())
            })
    }

    /// Delete both credentials.
    ///
    /// Idempotent: succeeds even when no session is stored.
    pub async fn clear(&self) -> Result<()> {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            self.secure_store.delete_secret(key).await.map_err(|e| {
                warn!(key = key, error = %e, "Failed to delete credential");
                AuthError::SecureStorageUnavailable(e.to_string())
            })?;
        }

        info!("Credentials cleared");

        Ok(())
    }

    async fn read_token(&self, key: &str) -> Result<Option<String>> {
        let data = self.secure_store.get_secret(key).await.map_err(|e| {
            warn!(key = key, error = %e, "Failed to read credential from secure storage");
            AuthError::SecureStorageUnavailable(e.to_string())
        })?;

        let Some(data) = data else {
            debug!(key = key, "No credential found in storage");
            return Ok(None);
        };

        match String::from_utf8(data) {
            Ok(token) => Ok(Some(token)),
            Err(_) => {
                warn!(key = key, "Stored credential is not valid UTF-8, deleting");

                if let Err(delete_err) = self.secure_store.delete_secret(key).await {
                    warn!(
                        key = key,
                        error = %delete_err,
                        "Failed to delete corrupted credential"
                    );
                }

                Ok(None)
            }
        }
    }

    async fn write_token(&self, key: &str, value: &str) -> Result<()> {
        self.secure_store
            .set_secret(key, value.as_bytes())
            .await
            .map_err(|e| {
                warn!(key = key, error = %e, "Failed to write credential to secure storage");
                AuthError::SecureStorageUnavailable(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// Mock implementation of SecureStore for testing
    #[derive(Clone, Default)]
    struct MockSecureStore {
        storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockSecureStore {
        fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait::async_trait]
    impl SecureStore for MockSecureStore {
        async fn set_secret(&self, key: &str, value: &[u8]) -> bridge_traits::error::Result<()> {
            let mut storage = self.storage.lock().await;
            storage.insert(key.to_string(), value.to_vec());
            Ok(())
        }

        async fn get_secret(&self, key: &str) -> bridge_traits::error::Result<Option<Vec<u8>>> {
            let storage = self.storage.lock().await;
            Ok(storage.get(key).cloned())
        }

        async fn delete_secret(&self, key: &str) -> bridge_traits::error::Result<()> {
            let mut storage = self.storage.lock().await;
            storage.remove(key);
            Ok(())
        }

        async fn has_secret(&self, key: &str) -> bridge_traits::error::Result<bool> {
            let storage = self.storage.lock().await;
            Ok(storage.contains_key(key))
        }

        async fn list_keys(&self) -> bridge_traits::error::Result<Vec<String>> {
            let storage = self.storage.lock().await;
            Ok(storage.keys().cloned().collect())
        }

        async fn clear_all(&self) -> bridge_traits::error::Result<()> {
            let mut storage = self.storage.lock().await;
            storage.clear();
            Ok(())
        }
    }

    fn pair(access: &str, refresh: Option<&str>) -> AuthTokens {
        AuthTokens::new(access.to_owned(), refresh.map(str::to_owned))
    }

    #[tokio::test]
    async fn test_store_and_read_tokens() {
        let credentials = CredentialStore::new(Arc::new(MockSecureStore::new()));

        credentials
            .store_tokens(&pair("access_123", Some("refresh_456")))
            .await
            .expect("Failed to store tokens");

        assert_eq!(
            credentials.access_token().await.unwrap().as_deref(),
            Some("access_123")
        );
        assert_eq!(
            credentials.refresh_token().await.unwrap().as_deref(),
            Some("refresh_456")
        );
    }

    #[tokio::test]
    async fn test_read_without_session() {
        let credentials = CredentialStore::new(Arc::new(MockSecureStore::new()));

        assert!(credentials.access_token().await.unwrap().is_none());
        assert!(credentials.refresh_token().await.unwrap().is_none());
        assert!(!credentials.has_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_refresh_token_kept_when_not_rotated() {
        let credentials = CredentialStore::new(Arc::new(MockSecureStore::new()));

        credentials
            .store_tokens(&pair("access_1", Some("refresh_1")))
            .await
            .unwrap();

        // A refresh response without a rotated refresh token only replaces
        // the access token
        credentials
            .store_tokens(&pair("access_2", None))
            .await
            .unwrap();

        assert_eq!(
            credentials.access_token().await.unwrap().as_deref(),
            Some("access_2")
        );
        assert_eq!(
            credentials.refresh_token().await.unwrap().as_deref(),
            Some("refresh_1")
        );
    }

    #[tokio::test]
    async fn test_clear_removes_both_tokens() {
        let credentials = CredentialStore::new(Arc::new(MockSecureStore::new()));

        credentials
            .store_tokens(&pair("access", Some("refresh")))
            .await
            .unwrap();
        assert!(credentials.has_session().await.unwrap());

        credentials.clear().await.unwrap();

        assert!(!credentials.has_session().await.unwrap());
        assert!(credentials.refresh_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_without_session_is_idempotent() {
        let credentials = CredentialStore::new(Arc::new(MockSecureStore::new()));
        credentials
            .clear()
            .await
            .expect("Clear should succeed with no stored session");
    }

    #[tokio::test]
    async fn test_corrupted_token_is_deleted() {
        let secure_store = Arc::new(MockSecureStore::new());
        secure_store
            .set_secret(ACCESS_TOKEN_KEY, &[0xff, 0xfe, 0x80])
            .await
            .unwrap();

        let credentials = CredentialStore::new(secure_store.clone());

        assert!(credentials.access_token().await.unwrap().is_none());
        assert!(!secure_store.has_secret(ACCESS_TOKEN_KEY).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_access_token_only() {
        let credentials = CredentialStore::new(Arc::new(MockSecureStore::new()));

        credentials
            .store_tokens(&pair("access_1", Some("refresh_1")))
            .await
            .unwrap();
        credentials.set_access_token("access_2").await.unwrap();

        assert_eq!(
            credentials.access_token().await.unwrap().as_deref(),
            Some("access_2")
        );
        assert_eq!(
            credentials.refresh_token().await.unwrap().as_deref(),
            Some("refresh_1")
        );
    }
}

//! # Authenticated Request Gateway
//!
//! Single entry point for storefront API traffic. Every request is stamped
//! with the stored access token; a 401 response triggers a token refresh
//! that is shared across all concurrent requests, after which the rejected
//! request is re-issued exactly once.
//!
//! ## Refresh coordination
//!
//! At most one refresh is in flight at any time. The first request to hit a
//! 401 installs a shared future; every other request that hits a 401 while
//! it is pending awaits the same future instead of starting its own. The
//! operation clears its own slot when it settles, so the next 401 after
//! settlement starts a fresh cycle.
//!
//! Requests aimed at the refresh endpoint itself are exempt: a 401 from it
//! is returned to the caller untouched, which keeps a dead refresh token
//! from looping.
//!
//! ## Session end
//!
//! When a refresh cycle fails terminally (no refresh token stored, or the
//! refresh endpoint rejects it), a single registered callback is invoked
//! once for the cycle before the error reaches the waiting requests. The
//! host app uses it to route to its sign-in surface.
//!
//! ## Usage
//!
//! ```no_run
//! use core_auth::ApiGateway;
//! use bridge_traits::{HttpClient, SecureStore};
//! use std::sync::Arc;
//! # async fn example(http: Arc<dyn HttpClient>, store: Arc<dyn SecureStore>) -> core_auth::Result<()> {
//! let gateway = ApiGateway::new(store, http, "https://shop.example.com/api/");
//!
//! gateway.on_session_ended(|| {
//!     // navigate to sign-in
//! });
//!
//! let response = gateway.get("products/all/?in_stock=True").await?;
//! # Ok(())
//! # }
//! ```

use crate::credential_store::CredentialStore;
use crate::error::{AuthError, Result};
use crate::types::AuthTokens;
use bridge_traits::{
    http::{HttpMethod, HttpRequest, HttpResponse},
    HttpClient, SecureStore,
};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Relative path of the token refresh endpoint.
///
/// Requests to this path never trigger a refresh themselves.
pub const REFRESH_ENDPOINT: &str = "users/auth/refresh/";

/// Default timeout applied to requests that don't carry their own.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Callback invoked when a refresh cycle fails terminally.
pub type SessionEndedHook = Box<dyn Fn() + Send + Sync>;

/// A refresh operation shared by every request waiting on it.
type SharedRefresh = Shared<BoxFuture<'static, Result<String>>>;

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// Authenticated HTTP gateway for the storefront API.
///
/// Cheap to clone-by-`Arc` and safe to share across tasks; all interior
/// state is synchronized.
pub struct ApiGateway {
    http: Arc<dyn HttpClient>,
    credentials: CredentialStore,
    base_url: String,
    request_timeout: Duration,
    /// Single slot for the in-flight refresh; `None` means idle.
    refresh_op: Arc<Mutex<Option<SharedRefresh>>>,
    /// Single-slot session-ended callback; a new registration replaces the
    /// previous one.
    session_ended: Arc<RwLock<Option<SessionEndedHook>>>,
}

impl ApiGateway {
    /// Create a gateway over the given transport and secure store.
    ///
    /// The base URL is normalized to end with a slash so relative paths
    /// join predictably.
    pub fn new(
        secure_store: Arc<dyn SecureStore>,
        http: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            http,
            credentials: CredentialStore::new(secure_store),
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            refresh_op: Arc::new(Mutex::new(None)),
            session_ended: Arc::new(RwLock::new(None)),
        }
    }

    /// Build a gateway from a validated [`StorefrontConfig`].
    ///
    /// Fails fast when the config carries no HTTP client; desktop hosts get
    /// one injected by the `desktop-shims` feature, mobile hosts must
    /// provide a platform-native adapter.
    pub fn from_config(
        config: &core_runtime::StorefrontConfig,
    ) -> core_runtime::Result<Self> {
        let http = config
            .http_client
            .clone()
            .ok_or_else(|| core_runtime::Error::CapabilityMissing {
                capability: "HttpClient".to_string(),
                message: "No HTTP client implementation provided. \
                          Desktop: ensure the 'desktop-shims' feature is enabled. \
                          Mobile: inject a platform-native adapter."
                    .to_string(),
            })?;

        Ok(
            Self::new(config.secure_store.clone(), http, config.api_base_url.clone())
                .with_request_timeout(config.request_timeout),
        )
    }

    /// Override the default per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Access the underlying credential store.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Register the session-ended callback.
    ///
    /// Only one callback is held at a time; registering again replaces the
    /// previous one. The callback fires once per failed refresh cycle.
    pub fn on_session_ended(&self, hook: impl Fn() + Send + Sync + 'static) {
        if let Ok(mut slot) = self.session_ended.write() {
            *slot = Some(Box::new(hook));
        }
    }

    /// Execute a request through the gateway.
    ///
    /// The stored access token is attached as a bearer credential (a
    /// pre-set `Authorization` header is left alone). On a 401 from any
    /// endpoint except the refresh endpoint, the gateway refreshes the
    /// access token and re-issues the request exactly once; the second
    /// response is returned verbatim, even if it is another 401.
    ///
    /// Non-401 statuses, including other 4xx and all 5xx, are returned to
    /// the caller unchanged; the gateway performs no retry for them.
    #[instrument(skip_all, fields(method = ?request.method, url = %request.url))]
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = self.prepare(request).await?;

        let response = self
            .http
            .execute(request.clone())
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if response.status != 401 || self.is_refresh_request(&request.url) {
            return Ok(response);
        }

        debug!("Request rejected with 401, joining refresh cycle");

        let access = self.refresh_access_token().await?;

        let retried = request.bearer_token(access);
        self.http
            .execute(retried)
            .await
            .map_err(|e| AuthError::Network(e.to_string()))
    }

    /// GET a relative path.
    pub async fn get(&self, path: &str) -> Result<HttpResponse> {
        self.execute(HttpRequest::new(HttpMethod::Get, self.url(path)))
            .await
    }

    /// POST a JSON body to a relative path.
    pub async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<HttpResponse> {
        let request = HttpRequest::new(HttpMethod::Post, self.url(path))
            .json(body)
            .map_err(|e| AuthError::Serialization(e.to_string()))?;
        self.execute(request).await
    }

    /// PUT a JSON body to a relative path.
    pub async fn put_json<T: Serialize>(&self, path: &str, body: &T) -> Result<HttpResponse> {
        let request = HttpRequest::new(HttpMethod::Put, self.url(path))
            .json(body)
            .map_err(|e| AuthError::Serialization(e.to_string()))?;
        self.execute(request).await
    }

    /// DELETE a relative path.
    pub async fn delete(&self, path: &str) -> Result<HttpResponse> {
        self.execute(HttpRequest::new(HttpMethod::Delete, self.url(path)))
            .await
    }

    /// DELETE a relative path with a JSON body (the cart API wants one).
    pub async fn delete_json<T: Serialize>(&self, path: &str, body: &T) -> Result<HttpResponse> {
        let request = HttpRequest::new(HttpMethod::Delete, self.url(path))
            .json(body)
            .map_err(|e| AuthError::Serialization(e.to_string()))?;
        self.execute(request).await
    }

    /// Resolve a relative path against the base URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    fn is_refresh_request(&self, url: &str) -> bool {
        url.contains(REFRESH_ENDPOINT)
    }

    /// Attach the stored access token and the default timeout.
    async fn prepare(&self, mut request: HttpRequest) -> Result<HttpRequest> {
        request.url = self.url(&request.url);

        if request.timeout.is_none() {
            request.timeout = Some(self.request_timeout);
        }

        if !request.headers.contains_key("Authorization") {
            if let Some(access) = self.credentials.access_token().await? {
                request = request.bearer_token(access);
            }
        }

        Ok(request)
    }

    /// Join the in-flight refresh operation, starting one if idle.
    ///
    /// Returns the fresh access token on success. All concurrent callers
    /// observe the same settlement.
    async fn refresh_access_token(&self) -> Result<String> {
        let op = {
            let mut slot = self.refresh_op.lock().await;
            match slot.as_ref() {
                Some(existing) => {
                    debug!("Refresh already in flight, attaching");
                    existing.clone()
                }
                None => {
                    let op = Self::run_refresh(
                        self.http.clone(),
                        self.credentials.clone(),
                        self.url(REFRESH_ENDPOINT),
                        self.request_timeout,
                        self.refresh_op.clone(),
                        self.session_ended.clone(),
                    )
                    .boxed()
                    .shared();
                    *slot = Some(op.clone());
                    op
                }
            }
        };

        op.await
    }

    /// Drive one refresh cycle to settlement.
    ///
    /// Owns its slot: the slot is reset to `None` here, and only here, for
    /// both outcomes. On failure the session-ended callback fires before
    /// any waiter observes the error.
    async fn run_refresh(
        http: Arc<dyn HttpClient>,
        credentials: CredentialStore,
        refresh_url: String,
        timeout: Duration,
        slot: Arc<Mutex<Option<SharedRefresh>>>,
        session_ended: Arc<RwLock<Option<SessionEndedHook>>>,
    ) -> Result<String> {
        let result = Self::do_refresh(&http, &credentials, &refresh_url, timeout).await;

        *slot.lock().await = None;

        if let Err(error) = &result {
            warn!(error = %error, "Refresh cycle failed, session has ended");
            if let Ok(hook) = session_ended.read() {
                if let Some(hook) = hook.as_ref() {
                    hook();
                }
            }
        }

        result
    }

    async fn do_refresh(
        http: &Arc<dyn HttpClient>,
        credentials: &CredentialStore,
        refresh_url: &str,
        timeout: Duration,
    ) -> Result<String> {
        // Fail fast with no network traffic when there is nothing to
        // refresh with
        let Some(refresh) = credentials.refresh_token().await? else {
            return Err(AuthError::MissingRefreshToken);
        };

        debug!("Refreshing access token");

        let request = HttpRequest::new(HttpMethod::Post, refresh_url)
            .json(&RefreshRequest { refresh: &refresh })
            .map_err(|e| AuthError::Serialization(e.to_string()))?
            .timeout(timeout);

        let response = http
            .execute(request)
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.is_success() {
            return Err(AuthError::RefreshFailed {
                status: response.status,
                message: response_error_message(&response),
            });
        }

        let body: RefreshResponse = response
            .json()
            .map_err(|e| AuthError::Serialization(e.to_string()))?;

        let tokens = AuthTokens::new(body.access, body.refresh);
        credentials.store_tokens(&tokens).await?;

        info!(
            rotated_refresh_token = tokens.refresh_token().is_some(),
            "Access token refreshed"
        );

        Ok(tokens.access_token().to_owned())
    }
}

/// Extract a human-readable message from an API error response.
///
/// The backend reports errors as `{"error": ...}`, `{"message": ...}` or
/// `{"detail": ...}`; fall back to the raw body when none is present.
pub fn response_error_message(response: &HttpResponse) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&response.body) {
        for field in ["error", "message", "detail"] {
            if let Some(message) = value.get(field).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }

    match response.text() {
        Ok(text) if !text.is_empty() => text,
        _ => format!("HTTP {}", response.status),
    }
}

//! End-to-end tests for refresh coordination under concurrency.
//!
//! These drive the gateway with a scripted transport and a deliberately slow
//! secure store so that several requests are in flight when a refresh cycle
//! starts, then assert on the exact wire traffic.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::SecureStore;
use bytes::Bytes;
use core_auth::{ApiGateway, AuthError, AuthTokens, REFRESH_ENDPOINT};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const BASE: &str = "https://shop.test/api/";

/// In-memory secure store with a configurable read latency, so concurrent
/// requests overlap the way they do against a real keychain.
#[derive(Clone, Default)]
struct SlowSecureStore {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    read_delay: Option<Duration>,
}

impl SlowSecureStore {
    fn with_read_delay(delay: Duration) -> Self {
        Self {
            read_delay: Some(delay),
            ..Self::default()
        }
    }
}

#[async_trait]
impl SecureStore for SlowSecureStore {
    async fn set_secret(&self, key: &str, value: &[u8]) -> BridgeResult<()> {
        self.storage
            .lock()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get_secret(&self, key: &str) -> BridgeResult<Option<Vec<u8>>> {
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.storage.lock().await.get(key).cloned())
    }

    async fn delete_secret(&self, key: &str) -> BridgeResult<()> {
        self.storage.lock().await.remove(key);
        Ok(())
    }

    async fn list_keys(&self) -> BridgeResult<Vec<String>> {
        Ok(self.storage.lock().await.keys().cloned().collect())
    }

    async fn clear_all(&self) -> BridgeResult<()> {
        self.storage.lock().await.clear();
        Ok(())
    }
}

/// Transport that pops scripted responses per URL, with optional per-URL
/// latency, and records everything sent through it.
#[derive(Default)]
struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<HttpResponse>>>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    async fn script(&self, url: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .await
            .entry(url.to_string())
            .or_default()
            .push_back(HttpResponse {
                status,
                headers: HashMap::new(),
                body: Bytes::from(body.to_string()),
            });
    }

    async fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.url == url)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl HttpClient for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.requests.lock().await.push(request.clone());

        if let Some(delay) = self.delays.get(&request.url) {
            tokio::time::sleep(*delay).await;
        }

        let mut routes = self.routes.lock().await;
        let queue = routes.get_mut(&request.url).ok_or_else(|| {
            BridgeError::OperationFailed(format!("unexpected request to {}", request.url))
        })?;
        queue.pop_front().ok_or_else(|| {
            BridgeError::OperationFailed(format!("no scripted response left for {}", request.url))
        })
    }
}

fn refresh_url() -> String {
    format!("{BASE}{REFRESH_ENDPOINT}")
}

/// Three requests racing into 401 share one refresh, then all succeed on
/// their single retry.
#[tokio::test]
async fn thundering_herd_shares_one_refresh() {
    let transport = Arc::new(
        ScriptedTransport::default().delay(&refresh_url(), Duration::from_millis(20)),
    );

    let urls = [
        format!("{BASE}products/1/"),
        format!("{BASE}products/2/"),
        format!("{BASE}products/3/"),
    ];
    for url in &urls {
        transport.script(url, 401, "").await;
    }
    transport
        .script(&refresh_url(), 200, r#"{"access": "fresh"}"#)
        .await;
    for url in &urls {
        transport.script(url, 200, "{}").await;
    }

    let store = SlowSecureStore::with_read_delay(Duration::from_millis(5));
    let gateway = ApiGateway::new(Arc::new(store), transport.clone(), BASE);
    gateway
        .credentials()
        .store_tokens(&AuthTokens::new("stale".into(), Some("refresh-1".into())))
        .await
        .unwrap();

    let (a, b, c) = tokio::join!(
        gateway.get("products/1/"),
        gateway.get("products/2/"),
        gateway.get("products/3/"),
    );

    assert_eq!(a.unwrap().status, 200);
    assert_eq!(b.unwrap().status, 200);
    assert_eq!(c.unwrap().status, 200);

    // Exactly one refresh call despite three rejected requests
    assert_eq!(transport.requests_to(&refresh_url()).await.len(), 1);

    // Each request went out twice, the retry carrying the fresh token
    for url in &urls {
        let sent = transport.requests_to(url).await;
        assert_eq!(sent.len(), 2, "expected one retry for {}", url);
        assert_eq!(
            sent[1].headers.get("Authorization"),
            Some(&"Bearer fresh".to_string())
        );
    }

    assert_eq!(
        gateway.credentials().access_token().await.unwrap().as_deref(),
        Some("fresh")
    );
}

/// With no refresh token stored, concurrent 401s all fail fast on the same
/// cycle: no refresh HTTP call, one session-ended notification.
#[tokio::test]
async fn dead_session_herd_fails_fast_and_notifies_once() {
    let transport = Arc::new(ScriptedTransport::default());

    let urls = [
        format!("{BASE}users/cart/"),
        format!("{BASE}orders/my-orders/"),
        format!("{BASE}users/saved-products/"),
    ];
    for url in &urls {
        transport.script(url, 401, "").await;
    }

    let store = SlowSecureStore::with_read_delay(Duration::from_millis(5));
    let gateway = ApiGateway::new(Arc::new(store), transport.clone(), BASE);
    gateway
        .credentials()
        .store_tokens(&AuthTokens::new("stale".into(), None))
        .await
        .unwrap();

    let ended = Arc::new(AtomicUsize::new(0));
    let counter = ended.clone();
    gateway.on_session_ended(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let (a, b, c) = tokio::join!(
        gateway.get("users/cart/"),
        gateway.get("orders/my-orders/"),
        gateway.get("users/saved-products/"),
    );

    for result in [a, b, c] {
        assert!(matches!(result, Err(AuthError::MissingRefreshToken)));
    }

    // The refresh endpoint was never contacted
    assert!(transport.requests_to(&refresh_url()).await.is_empty());

    // One failed cycle, one notification
    assert_eq!(ended.load(Ordering::SeqCst), 1);
}

/// A settled failure does not wedge the gateway: signing in again and
/// retrying works on a brand-new cycle.
#[tokio::test]
async fn gateway_recovers_after_failed_cycle() {
    let transport = Arc::new(ScriptedTransport::default());
    let cart_url = format!("{BASE}users/cart/");

    // First attempt dies with a rejected refresh
    transport.script(&cart_url, 401, "").await;
    transport
        .script(&refresh_url(), 401, r#"{"detail": "token blacklisted"}"#)
        .await;
    // After re-login the same call succeeds outright
    transport.script(&cart_url, 200, "{}").await;

    let gateway = ApiGateway::new(
        Arc::new(SlowSecureStore::default()),
        transport.clone(),
        BASE,
    );
    gateway
        .credentials()
        .store_tokens(&AuthTokens::new("stale".into(), Some("dead-refresh".into())))
        .await
        .unwrap();

    let first = gateway.get("users/cart/").await;
    assert!(matches!(first, Err(AuthError::RefreshFailed { .. })));

    // Host app signs the user back in
    gateway
        .credentials()
        .store_tokens(&AuthTokens::new("fresh".into(), Some("refresh-2".into())))
        .await
        .unwrap();

    let second = gateway.get("users/cart/").await.unwrap();
    assert_eq!(second.status, 200);

    let sent = transport.requests_to(&cart_url).await;
    assert_eq!(
        sent.last().unwrap().headers.get("Authorization"),
        Some(&"Bearer fresh".to_string())
    );
}

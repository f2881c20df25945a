//! Shared fakes for the client tests in this crate.

use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::SecureStore;
use bytes::Bytes;
use core_auth::{ApiGateway, ACCESS_TOKEN_KEY};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const BASE: &str = "https://shop.test/api/";

#[derive(Clone, Default)]
pub struct MockSecureStore {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

#[async_trait::async_trait]
impl SecureStore for MockSecureStore {
    async fn set_secret(&self, key: &str, value: &[u8]) -> BridgeResult<()> {
        self.storage
            .lock()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get_secret(&self, key: &str) -> BridgeResult<Option<Vec<u8>>> {
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

/// Replays canned responses per URL and records every request it saw.
#[derive(Default)]
pub struct ScriptedHttpClient {
    routes: Mutex<HashMap<String, VecDeque<HttpResponse>>>,
    pub requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub async fn script(&self, url: &str, status: u16, body: &str) {
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

    pub async fn requests_for(&self, url: &str) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.url == url)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.requests.lock().await.push(request.clone());
        let mut routes = self.routes.lock().await;
        let queue = routes.get_mut(&request.url).ok_or_else(|| {
            BridgeError::OperationFailed(format!("unexpected request to {}", request.url))
        })?;
        queue.pop_front().ok_or_else(|| {
            BridgeError::OperationFailed(format!("no scripted response left for {}", request.url))
        })
    }
}

/// A gateway over the scripted transport with a token already in place.
pub async fn gateway(http: Arc<ScriptedHttpClient>) -> Arc<ApiGateway> {
    let store = MockSecureStore::default();
    store
        .set_secret(ACCESS_TOKEN_KEY, b"test-access")
        .await
        .unwrap();
    Arc::new(ApiGateway::new(Arc::new(store), http, BASE))
}

//! End-to-end tests for the HTTP surface.
//!
//! Each test serves the real router on an ephemeral loopback port, backed by
//! an in-memory counter store that can simulate an unreachable cache.
//!
//! Run with: cargo test --test http_routes
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hello_counter::config::AppConfig;
use hello_counter::{create_router, AppState, CounterError, CounterStore};

/// In-memory store whose first `outage` calls fail as if the cache were down.
#[derive(Default)]
struct MemoryStore {
    values: Mutex<std::collections::HashMap<String, i64>>,
    outage: AtomicUsize,
    calls: AtomicU32,
}

impl MemoryStore {
    fn with_outage(outage: usize) -> Arc<Self> {
        let store = Self::default();
        store.outage.store(outage, Ordering::SeqCst);
        Arc::new(store)
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn incr(&self, key: &str) -> Result<i64, CounterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let down = self
            .outage
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if down {
            return Err(CounterError::Connection(
                "Connection refused (os error 111)".to_string(),
            ));
        }
        let mut values = self.values.lock().unwrap();
        let value = values.entry(key.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }
}

/// Config with a short retry delay so outage tests stay fast.
fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.counter.retry_delay_ms = 10;
    config
}

async fn spawn_app(state: AppState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spawn_with_store(store: Arc<MemoryStore>) -> SocketAddr {
    spawn_app(AppState::new(test_config(), store)).await
}

/// Pull the visit count out of the greeting body.
fn count_in(body: &str) -> i64 {
    body.split_whitespace()
        .filter_map(|word| word.parse().ok())
        .last()
        .unwrap_or_else(|| panic!("no count in {body:?}"))
}

#[tokio::test]
async fn test_health_ok() {
    let addr = spawn_with_store(MemoryStore::with_outage(0)).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["cache-control"], "no-store");
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_health_ignores_cache_outage() {
    let store = MemoryStore::with_outage(usize::MAX);
    let addr = spawn_with_store(store.clone()).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_hello_counts_sequential_visits() {
    let addr = spawn_with_store(MemoryStore::with_outage(0)).await;

    for expected in 1..=3 {
        let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
        assert_eq!(response.status(), 200);
        let body = response.text().await.unwrap();
        assert!(body.contains("Hello!"), "body: {body:?}");
        assert_eq!(count_in(&body), expected);
    }
}

#[tokio::test]
async fn test_hello_survives_short_outage() {
    let store = MemoryStore::with_outage(5);
    let addr = spawn_with_store(store.clone()).await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(count_in(&response.text().await.unwrap()), 1);
    assert_eq!(store.calls(), 6);
}

#[tokio::test]
async fn test_hello_fails_after_retry_budget() {
    let store = MemoryStore::with_outage(6);
    let addr = spawn_with_store(store.clone()).await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), 500);
    assert_eq!(store.calls(), 6);

    // The cache is back; the next visit is the first one counted
    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(count_in(&response.text().await.unwrap()), 1);
}

#[tokio::test]
async fn test_static_greeting_when_counter_disabled() {
    let mut config = test_config();
    config.counter.enabled = false;
    let store = MemoryStore::with_outage(0);
    let addr = spawn_app(AppState::new(config, store.clone())).await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Hello!"));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let addr = spawn_with_store(MemoryStore::with_outage(0)).await;

    let response = reqwest::get(format!("http://{addr}/missing")).await.unwrap();
    assert_eq!(response.status(), 404);
}

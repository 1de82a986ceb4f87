// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use nearby_connect::config::Config;
use nearby_connect::db::{FirestoreStore, MemoryStore, UserStore};
use nearby_connect::error::AppError;
use nearby_connect::models::UserRecord;
use nearby_connect::routes::create_router;
use nearby_connect::services::ProximityDirectory;
use nearby_connect::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a Firestore store against the emulator.
#[allow(dead_code)]
pub async fn test_firestore() -> FirestoreStore {
    FirestoreStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Directory over a fresh in-memory store.
#[allow(dead_code)]
pub fn test_directory() -> ProximityDirectory {
    ProximityDirectory::new(Arc::new(MemoryStore::new()))
}

/// Memory store that yields to the scheduler before every call, so
/// concurrent read-modify-write sequences actually interleave.
#[derive(Default)]
pub struct YieldingStore {
    inner: MemoryStore,
}

#[async_trait]
impl UserStore for YieldingStore {
    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        tokio::task::yield_now().await;
        self.inner.list_users().await
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, AppError> {
        tokio::task::yield_now().await;
        let user = self.inner.get_user(id).await;
        tokio::task::yield_now().await;
        user
    }

    async fn upsert_user(&self, user: &UserRecord) -> Result<(), AppError> {
        tokio::task::yield_now().await;
        self.inner.upsert_user(user).await
    }
}

/// Create a test app over the given store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_app_with_store(store: Arc<dyn UserStore>) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        directory: ProximityDirectory::new(store),
    });

    (create_router(state.clone()), state)
}

/// Create a test app over an empty in-memory store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_app_with_store(Arc::new(MemoryStore::new()))
}

/// Create a test app whose store fails every call.
#[allow(dead_code)]
pub fn create_offline_app() -> (axum::Router, Arc<AppState>) {
    create_app_with_store(Arc::new(FirestoreStore::new_mock()))
}

/// Build a POST request with a JSON body.
#[allow(dead_code)]
pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a bodiless request.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Unique suffix for test isolation against shared backends.
#[allow(dead_code)]
pub fn unique_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

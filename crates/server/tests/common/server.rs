//! Server test utilities.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use storefront_catalog::{CatalogStore, SqliteStore};
use storefront_core::config::{AppConfig, CatalogConfig, ServerConfig, StorageConfig};
use storefront_server::{AppState, create_router};
use storefront_storage::{AssetStore, FilesystemBackend};
use tempfile::TempDir;
use tower::ServiceExt;

/// Public API base used by test servers.
#[allow(dead_code)]
pub const TEST_HOST_API: &str = "http://shop.test/api";

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server over temporary storage and SQLite.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let storage_path = temp_dir.path().join("uploads");
        let storage: Arc<dyn AssetStore> = Arc::new(
            FilesystemBackend::new(&storage_path)
                .await
                .expect("Failed to create storage backend"),
        );

        let db_path = temp_dir.path().join("catalog.db");
        let catalog: Arc<dyn CatalogStore> = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("Failed to create catalog store"),
        );

        let mut config = AppConfig {
            server: ServerConfig {
                host_api: TEST_HOST_API.to_string(),
                ..Default::default()
            },
            storage: StorageConfig::Filesystem { path: storage_path },
            catalog: CatalogConfig::Sqlite { path: db_path },
        };
        modifier(&mut config);

        let state =
            AppState::new(config, storage, catalog).expect("Failed to register metrics");
        Self::from_state(state, temp_dir)
    }

    /// Create a test server whose seed endpoint uses `dataset`.
    pub async fn with_seed_dataset(dataset: &str) -> Self {
        let server = Self::new().await;
        let state = server.state.clone().with_seed_dataset(dataset);
        Self::from_state(state, server._temp_dir)
    }

    fn from_state(state: AppState, temp_dir: TempDir) -> Self {
        let router = create_router(state.clone());
        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Send a JSON request and decode the JSON response.
    pub async fn json(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        json_request(&self.router, method, uri, body).await
    }
}

/// Helper to make JSON requests.
#[allow(dead_code)]
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let (status, _, body_bytes) = send(router, request).await;

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Send a raw request, returning status, headers and body bytes.
#[allow(dead_code)]
pub async fn send(
    router: &axum::Router,
    request: Request<Body>,
) -> (StatusCode, axum::http::HeaderMap, bytes::Bytes) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body_bytes)
}

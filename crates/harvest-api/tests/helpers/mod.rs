//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p harvest-api --test upload_test`.
//! Stores are the local filesystem (in a temp dir) and the in-memory document store.

pub mod fixtures;

use axum_test::TestServer;
use harvest_api::setup::routes;
use harvest_api::{AppState, Clock};
use harvest_core::{Config, DocumentBackend, StorageBackend};
use harvest_db::MemoryDocumentStore;
use harvest_storage::LocalBlobStore;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Clock start used by every test app: 2024-03-01T10:00:00Z.
pub const START_MILLIS: i64 = 1_709_287_200_000;

pub const BLOB_BASE_URL: &str = "http://localhost:8080/blobs";

/// Advances one millisecond per reading.
pub struct SteppingClock(AtomicI64);

impl Clock for SteppingClock {
    fn now_millis(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub documents: Arc<MemoryDocumentStore>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn create_test_config(temp_dir: &TempDir) -> Config {
    Config {
        storage_backend: StorageBackend::Local,
        local_storage_path: Some(temp_dir.path().to_string_lossy().to_string()),
        local_storage_base_url: Some(BLOB_BASE_URL.to_string()),
        document_backend: DocumentBackend::Memory,
        max_body_size_bytes: 1024 * 1024,
        ..Config::default()
    }
}

/// Setup test app with local blob storage and an in-memory document store.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Same as [`setup_test_app`], with a hook to adjust the config first.
pub async fn setup_test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let mut config = create_test_config(&temp_dir);
    customize(&mut config);

    let blob_store = Arc::new(
        LocalBlobStore::new(temp_dir.path(), BLOB_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    );
    let documents = Arc::new(MemoryDocumentStore::new());

    let state = Arc::new(AppState::new(
        config.clone(),
        blob_store,
        documents.clone(),
        Arc::new(SteppingClock(AtomicI64::new(START_MILLIS))),
    ));

    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        documents,
        temp_dir,
    }
}

//! Common test utilities for in-process API testing.
//!
//! Builds the full router over a temp-dir inbox with a mock transcoder
//! and object store, so API behavior can be tested end to end without
//! external infrastructure.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use courier_core::{
    testing::MockObjectStore, Config, IngestPipeline, PipelineConfig, ProcessingJournal,
    SqliteJournal, Transcoder, UploadPolicy, Uploader,
};
use courier_server::api::create_router;
use courier_server::state::AppState;

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// In-process server with controllable collaborators.
pub struct TestFixture {
    pub router: Router,
    pub store: Arc<MockObjectStore>,
    pub journal: Arc<SqliteJournal>,
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new(transcoder: Arc<dyn Transcoder>, store: MockObjectStore) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(store);
        let journal = Arc::new(SqliteJournal::in_memory().expect("Failed to create journal"));

        let config_toml = format!(
            r#"
[server]
host = "127.0.0.1"
port = 0

[recordings]
recordings_path = "{}"

[storage]
endpoint = "https://store.example.com"
bucket = "bucket"
access_key_id = "test-key"
secret_access_key = "test-secret"

[scheduler]
enabled = false
"#,
            temp_dir.path().display()
        );
        let config: Config =
            courier_core::load_config_from_str(&config_toml).expect("Failed to parse test config");

        let uploader = Arc::new(Uploader::new(
            store.clone() as Arc<dyn courier_core::ObjectStore>,
            UploadPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(2),
            },
            &config.storage.endpoint,
            &config.storage.bucket,
        ));

        let pipeline = Arc::new(IngestPipeline::new(
            PipelineConfig::from_config(&config),
            transcoder,
            uploader,
            Arc::new(courier_core::FsRelocator::new()),
            journal.clone() as Arc<dyn ProcessingJournal>,
        ));

        let state = Arc::new(AppState::new(
            config,
            pipeline,
            journal.clone() as Arc<dyn ProcessingJournal>,
            CancellationToken::new(),
        ));

        Self {
            router: create_router(state),
            store,
            journal,
            temp_dir,
        }
    }

    /// Drops a fake recording into the inbox.
    pub fn seed(&self, name: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, b"mjr content").expect("Failed to create source file");
        path
    }

    pub fn processed(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join("processed").join(name)
    }

    pub fn inbox(&self) -> &Path {
        self.temp_dir.path()
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path).await
    }

    async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).to_string(),
            ))
        };

        TestResponse { status, body }
    }
}

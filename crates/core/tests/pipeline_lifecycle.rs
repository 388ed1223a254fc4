//! Pipeline lifecycle integration tests.
//!
//! End-to-end runs over a real temp-dir inbox with mock transcoder and
//! object store:
//! - Full happy path: discover, convert, upload, relocate, journal
//! - Per-file isolation when one file fails
//! - Upload retry exhaustion leaving the source in place
//! - Run-level mutual exclusion

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use courier_core::{
    testing::{MockObjectStore, MockTranscoder},
    IngestPipeline, PipelineConfig, ProcessingJournal, ProcessingStatus, RecordFilter,
    RelocateError, Relocator, SqliteJournal, UploadPolicy, Uploader,
};

/// Test helper wiring the pipeline to mocks over a temp inbox.
struct TestHarness {
    pipeline: Arc<IngestPipeline>,
    store: Arc<MockObjectStore>,
    journal: Arc<SqliteJournal>,
    inbox: TempDir,
}

impl TestHarness {
    fn new(transcoder: MockTranscoder, store: MockObjectStore) -> Self {
        let inbox = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(store);
        let journal = Arc::new(SqliteJournal::in_memory().expect("Failed to create journal"));

        let config = PipelineConfig {
            recordings_path: inbox.path().to_path_buf(),
            processed_path: inbox.path().join("processed"),
            source_ext: "mjr".to_string(),
            output_ext: "opus".to_string(),
            key_prefix: "recordings".to_string(),
        };

        let uploader = Uploader::new(
            store.clone() as Arc<dyn courier_core::ObjectStore>,
            UploadPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(2),
            },
            "https://store.example.com",
            "bucket",
        );

        let pipeline = Arc::new(IngestPipeline::new(
            config,
            Arc::new(transcoder),
            Arc::new(uploader),
            Arc::new(courier_core::FsRelocator::new()),
            journal.clone() as Arc<dyn courier_core::ProcessingJournal>,
        ));

        Self {
            pipeline,
            store,
            journal,
            inbox,
        }
    }

    fn seed(&self, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = self.inbox.path().join(name);
                std::fs::write(&path, b"mjr content").expect("Failed to create source file");
                path
            })
            .collect()
    }

    fn processed(&self, name: &str) -> PathBuf {
        self.inbox.path().join("processed").join(name)
    }

    fn inbox_path(&self, name: &str) -> PathBuf {
        self.inbox.path().join(name)
    }
}

async fn run(harness: &TestHarness) -> courier_core::BatchReport {
    harness
        .pipeline
        .run_batch(&CancellationToken::new())
        .await
        .expect("batch run failed")
}

#[tokio::test]
async fn test_happy_path_full_lifecycle() {
    let harness = TestHarness::new(MockTranscoder::new(), MockObjectStore::new());
    harness.seed(&["room-1-audio.mjr", "room-2-audio.mjr"]);

    let report = run(&harness).await;

    assert_eq!(report.discovered, 2);
    assert_eq!(report.completed, 2);
    assert_eq!(report.failed, 0);

    // Sources moved, artifacts left next to where they were produced
    assert!(harness.processed("room-1-audio.mjr").exists());
    assert!(harness.processed("room-2-audio.mjr").exists());
    assert!(harness.inbox_path("room-1-audio.opus").exists());

    // One PUT per file, keyed under the prefix
    let puts = harness.store.puts();
    assert_eq!(puts.len(), 2);
    assert_eq!(puts[0].key, "recordings/room-1-audio.opus");
    assert_eq!(puts[1].key, "recordings/room-2-audio.opus");

    // Journal holds one completed row per file with the public URL
    let records = harness.journal.query(&RecordFilter::new()).unwrap();
    assert_eq!(records.len(), 2);
    for record in &records {
        assert_eq!(record.status, ProcessingStatus::Completed);
        let url = record.remote_url.as_deref().unwrap();
        assert!(url.starts_with("https://store.example.com/bucket/recordings/"));
    }
}

#[tokio::test]
async fn test_one_bad_file_does_not_stop_the_rest() {
    let harness = TestHarness::new(
        MockTranscoder::new().fail_on("corrupt"),
        MockObjectStore::new(),
    );
    harness.seed(&[
        "a-audio.mjr",
        "corrupt-audio.mjr",
        "z-audio.mjr",
    ]);

    let report = run(&harness).await;

    assert_eq!(report.discovered, 3);
    assert_eq!(report.completed, 2);
    assert_eq!(report.failed, 1);

    // The bad file stays in the inbox for inspection
    assert!(harness.inbox_path("corrupt-audio.mjr").exists());
    assert!(harness.processed("a-audio.mjr").exists());
    assert!(harness.processed("z-audio.mjr").exists());

    let failed = harness
        .journal
        .query(&RecordFilter::new().with_status(ProcessingStatus::Error))
        .unwrap();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].source_file.contains("corrupt-audio.mjr"));
    assert!(failed[0].error.as_deref().unwrap().contains("Conversion failed"));
}

#[tokio::test]
async fn test_transient_upload_failures_are_retried_to_success() {
    // First two PUTs fail, third succeeds; one file needs exactly 3
    let harness = TestHarness::new(MockTranscoder::new(), MockObjectStore::failing_first(2));
    harness.seed(&["a-audio.mjr"]);

    let report = run(&harness).await;

    assert_eq!(report.completed, 1);
    assert_eq!(harness.store.call_count(), 3);
    assert!(harness.processed("a-audio.mjr").exists());

    let records = harness.journal.query(&RecordFilter::new()).unwrap();
    assert_eq!(records[0].status, ProcessingStatus::Completed);
}

#[tokio::test]
async fn test_upload_exhaustion_fails_the_file_only() {
    let harness = TestHarness::new(MockTranscoder::new(), MockObjectStore::failing_always());
    harness.seed(&["a-audio.mjr"]);

    let report = run(&harness).await;

    assert_eq!(report.completed, 0);
    assert_eq!(report.failed, 1);
    assert_eq!(harness.store.call_count(), 3);

    // Not relocated; the next run can try again
    assert!(harness.inbox_path("a-audio.mjr").exists());
    assert!(!harness.processed("a-audio.mjr").exists());

    let records = harness.journal.query(&RecordFilter::new()).unwrap();
    assert_eq!(records[0].status, ProcessingStatus::Error);
    assert!(records[0]
        .error
        .as_deref()
        .unwrap()
        .contains("after 3 attempts"));
}

#[tokio::test]
async fn test_relocation_failure_keeps_artifact_and_url_in_the_record() {
    /// Relocator standing in for a read-only processed directory.
    struct ReadOnlyRelocator;

    #[async_trait]
    impl Relocator for ReadOnlyRelocator {
        fn name(&self) -> &str {
            "read-only"
        }

        async fn relocate(
            &self,
            source: &Path,
            dest_dir: &Path,
        ) -> Result<PathBuf, RelocateError> {
            Err(RelocateError::RenameFailed {
                from: source.to_path_buf(),
                to: dest_dir.join(source.file_name().unwrap()),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only file system",
                ),
            })
        }
    }

    let inbox = TempDir::new().unwrap();
    std::fs::write(inbox.path().join("a-audio.mjr"), b"mjr content").unwrap();

    let store = Arc::new(MockObjectStore::new());
    let journal = Arc::new(SqliteJournal::in_memory().unwrap());
    let uploader = Uploader::new(
        store.clone() as Arc<dyn courier_core::ObjectStore>,
        UploadPolicy::default(),
        "https://store.example.com",
        "bucket",
    );
    let pipeline = IngestPipeline::new(
        PipelineConfig {
            recordings_path: inbox.path().to_path_buf(),
            processed_path: inbox.path().join("processed"),
            source_ext: "mjr".to_string(),
            output_ext: "opus".to_string(),
            key_prefix: "recordings".to_string(),
        },
        Arc::new(MockTranscoder::new()),
        Arc::new(uploader),
        Arc::new(ReadOnlyRelocator),
        journal.clone() as Arc<dyn courier_core::ProcessingJournal>,
    );

    let report = pipeline.run_batch(&CancellationToken::new()).await.unwrap();

    assert_eq!(report.completed, 0);
    assert_eq!(report.failed, 1);

    // Everything up to relocation happened
    assert_eq!(store.call_count(), 1);
    assert!(inbox.path().join("a-audio.mjr").exists());

    // The failed record keeps the artifacts produced before the failure
    let records = journal.query(&RecordFilter::new()).unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.status, ProcessingStatus::Error);
    assert!(record
        .output_file
        .as_deref()
        .unwrap()
        .ends_with("a-audio.opus"));
    assert!(record
        .remote_url
        .as_deref()
        .unwrap()
        .starts_with("https://store.example.com/bucket/recordings/"));
    assert!(record.error.as_deref().unwrap().contains("Failed to move"));
}

#[tokio::test]
async fn test_discovery_ignores_non_candidates() {
    let harness = TestHarness::new(MockTranscoder::new(), MockObjectStore::new());
    harness.seed(&[
        "a-audio.mjr",
        "a-video.mjr",
        "a-audio.opus",
        "README.txt",
    ]);
    std::fs::create_dir(harness.inbox_path("subdir-audio.mjr")).unwrap();

    let report = run(&harness).await;

    assert_eq!(report.discovered, 1);
    assert_eq!(report.completed, 1);
    assert!(harness.inbox_path("a-video.mjr").exists());
}

#[tokio::test]
async fn test_second_concurrent_run_is_rejected() {
    let harness = TestHarness::new(MockTranscoder::new(), MockObjectStore::new());
    // Enough files that the first run is still going when the second starts
    let names: Vec<String> = (0..20).map(|i| format!("f{i:02}-audio.mjr")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    harness.seed(&name_refs);

    let first = {
        let pipeline = harness.pipeline.clone();
        tokio::spawn(async move { pipeline.run_batch(&CancellationToken::new()).await })
    };

    // Poke the lock until the first run has taken it
    let mut saw_rejection = false;
    for _ in 0..50 {
        match harness.pipeline.run_batch(&CancellationToken::new()).await {
            Err(courier_core::BatchError::AlreadyRunning) => {
                saw_rejection = true;
                break;
            }
            Ok(_) => break, // first run already finished
            Err(e) => panic!("unexpected batch error: {e}"),
        }
    }

    let report = first.await.unwrap().unwrap();
    assert_eq!(report.discovered, 20);
    assert!(saw_rejection || report.completed == 20);
}

#[tokio::test]
async fn test_cancellation_stops_between_files() {
    let harness = TestHarness::new(MockTranscoder::new(), MockObjectStore::new());
    harness.seed(&["a-audio.mjr", "b-audio.mjr"]);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = harness.pipeline.run_batch(&cancel).await.unwrap();
    assert_eq!(report.discovered, 2);
    assert_eq!(report.completed, 0);
    assert_eq!(report.failed, 0);

    // Nothing was touched
    assert!(harness.inbox_path("a-audio.mjr").exists());
    assert_eq!(harness.store.call_count(), 0);
}

#[tokio::test]
async fn test_subsequent_run_picks_up_new_files() {
    let harness = TestHarness::new(MockTranscoder::new(), MockObjectStore::new());
    harness.seed(&["a-audio.mjr"]);

    let first = run(&harness).await;
    assert_eq!(first.completed, 1);

    harness.seed(&["b-audio.mjr"]);
    let second = run(&harness).await;
    assert_eq!(second.discovered, 1);
    assert_eq!(second.completed, 1);

    assert!(harness.processed("a-audio.mjr").exists());
    assert!(harness.processed("b-audio.mjr").exists());
    assert_eq!(harness.journal.count(&RecordFilter::new()).unwrap(), 2);
}

#[tokio::test]
async fn test_reports_carry_distinct_run_ids() {
    let harness = TestHarness::new(MockTranscoder::new(), MockObjectStore::new());
    let first = run(&harness).await;
    let second = run(&harness).await;
    assert_ne!(first.run_id, second.run_id);
}

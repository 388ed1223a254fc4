//! Batch runner implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::journal::{ProcessingJournal, ProcessingRecord, ProcessingStatus};
use crate::metrics::{BATCH_RUNS, FILES_PROCESSED};
use crate::relocator::Relocator;
use crate::transcoder::Transcoder;
use crate::uploader::{FileSource, Uploader};

use super::config::PipelineConfig;
use super::types::{BatchError, BatchReport};

/// Drives recordings from the inbox to the object store.
///
/// All side-effecting collaborators are injected, so every stage can
/// be substituted in tests.
pub struct IngestPipeline {
    config: PipelineConfig,
    transcoder: Arc<dyn Transcoder>,
    uploader: Arc<Uploader>,
    relocator: Arc<dyn Relocator>,
    journal: Arc<dyn ProcessingJournal>,
    run_lock: Mutex<()>,
}

impl IngestPipeline {
    pub fn new(
        config: PipelineConfig,
        transcoder: Arc<dyn Transcoder>,
        uploader: Arc<Uploader>,
        relocator: Arc<dyn Relocator>,
        journal: Arc<dyn ProcessingJournal>,
    ) -> Self {
        Self {
            config,
            transcoder,
            uploader,
            relocator,
            journal,
            run_lock: Mutex::new(()),
        }
    }

    /// Runs one batch over the inbox.
    ///
    /// At most one run is in flight at a time; a second caller gets
    /// [`BatchError::AlreadyRunning`] instead of queueing. Individual
    /// file failures are journaled and do not abort the batch.
    pub async fn run_batch(&self, cancel: &CancellationToken) -> Result<BatchReport, BatchError> {
        let _guard = match self.run_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                BATCH_RUNS.with_label_values(&["skipped"]).inc();
                return Err(BatchError::AlreadyRunning);
            }
        };

        let start = Instant::now();
        let run_id = Uuid::new_v4().to_string();

        let result = self.run_locked(&run_id, cancel).await;
        match &result {
            Ok(report) => {
                BATCH_RUNS.with_label_values(&["completed"]).inc();
                info!(
                    run_id = %run_id,
                    discovered = report.discovered,
                    completed = report.completed,
                    failed = report.failed,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "batch run finished"
                );
            }
            Err(e) => {
                BATCH_RUNS.with_label_values(&["failed"]).inc();
                error!(run_id = %run_id, error = %e, "batch run failed");
            }
        }
        result
    }

    async fn run_locked(
        &self,
        run_id: &str,
        cancel: &CancellationToken,
    ) -> Result<BatchReport, BatchError> {
        let start = Instant::now();

        tokio::fs::create_dir_all(&self.config.processed_path)
            .await
            .map_err(|e| BatchError::ProcessedDirUnavailable {
                path: self.config.processed_path.clone(),
                source: e,
            })?;

        let candidates = self.discover().await?;
        info!(run_id = %run_id, discovered = candidates.len(), "starting batch run");

        let mut completed = 0usize;
        let mut failed = 0usize;

        for candidate in &candidates {
            if cancel.is_cancelled() {
                warn!(run_id = %run_id, "batch run cancelled, leaving remaining files for the next run");
                break;
            }

            let record = self.process_file(candidate, cancel).await;
            let mut succeeded = record.status == ProcessingStatus::Completed;

            // An outcome that cannot be journaled fails the file, even if
            // every stage before it succeeded.
            if let Err(e) = self.journal.append(&record) {
                error!(
                    run_id = %run_id,
                    file = %record.source_file,
                    error = %e,
                    "failed to journal outcome"
                );
                succeeded = false;
            }

            let label = if succeeded {
                completed += 1;
                "completed"
            } else {
                failed += 1;
                "error"
            };
            FILES_PROCESSED.with_label_values(&[label]).inc();
        }

        Ok(BatchReport {
            run_id: run_id.to_string(),
            discovered: candidates.len(),
            completed,
            failed,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Lists candidate recordings, sorted by file name.
    ///
    /// Only plain files directly in the inbox whose name ends with the
    /// candidate suffix are considered.
    async fn discover(&self) -> Result<Vec<PathBuf>, BatchError> {
        let suffix = self.config.candidate_suffix();
        let list_err = |e: std::io::Error| BatchError::ListFailed {
            path: self.config.recordings_path.clone(),
            source: e,
        };

        let mut entries = tokio::fs::read_dir(&self.config.recordings_path)
            .await
            .map_err(list_err)?;

        let mut candidates = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
            let file_type = entry.file_type().await.map_err(list_err)?;
            if !file_type.is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().ends_with(&suffix) {
                candidates.push(entry.path());
            }
        }

        candidates.sort();
        Ok(candidates)
    }

    /// Processes one file to a terminal state.
    ///
    /// Never propagates an error; every path ends in a journalable
    /// record, completed or failed.
    async fn process_file(&self, source: &Path, cancel: &CancellationToken) -> ProcessingRecord {
        let source_str = source.display().to_string();
        info!(file = %source_str, stage = "converting", "processing recording");

        let output = match self.transcoder.convert(source).await {
            Ok(path) => path,
            Err(e) => {
                error!(file = %source_str, error = %e, "conversion failed");
                return ProcessingRecord::failed(source_str, e.to_string());
            }
        };
        let output_str = output.display().to_string();

        let file_name = match output.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => {
                return ProcessingRecord::failed(
                    source_str,
                    format!("Output path has no file name: {output_str}"),
                )
                .with_output_file(output_str);
            }
        };

        info!(file = %source_str, stage = "uploading", "processing recording");
        let mut upload_source = match FileSource::open(&output).await {
            Ok(s) => s,
            Err(e) => {
                error!(file = %source_str, error = %e, "failed to open artifact");
                return ProcessingRecord::failed(
                    source_str,
                    format!("Failed to open artifact {output_str}: {e}"),
                )
                .with_output_file(output_str);
            }
        };

        let key = self.config.object_key(&file_name);
        let url = match self
            .uploader
            .upload(
                &mut upload_source,
                &key,
                self.config.content_type(),
                cancel,
            )
            .await
        {
            Ok(url) => url,
            Err(e) => {
                error!(file = %source_str, error = %e, "upload failed");
                return ProcessingRecord::failed(source_str, e.to_string())
                    .with_output_file(output_str);
            }
        };

        info!(file = %source_str, stage = "relocating", "processing recording");
        if let Err(e) = self
            .relocator
            .relocate(source, &self.config.processed_path)
            .await
        {
            error!(file = %source_str, error = %e, "relocation failed");
            return ProcessingRecord::failed(source_str, e.to_string())
                .with_output_file(output_str)
                .with_remote_url(url);
        }

        info!(file = %source_str, stage = "completed", url = %url, "processing recording");
        ProcessingRecord::completed(source_str, output_str, url)
    }
}

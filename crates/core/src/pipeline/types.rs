//! Types for the pipeline module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Summary of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique id assigned to this run.
    pub run_id: String,
    /// Candidate files found in the inbox.
    pub discovered: usize,
    /// Files that reached the completed state.
    pub completed: usize,
    /// Files that ended in an error state.
    pub failed: usize,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

/// Batch-level failures that abort a run before any file is touched.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Another run holds the lock; concurrent runs are not allowed.
    #[error("A batch run is already in progress")]
    AlreadyRunning,

    /// The processed directory could not be created.
    #[error("Processed directory {path} is unavailable: {source}")]
    ProcessedDirUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The inbox could not be listed.
    #[error("Failed to list recordings in {path}: {source}")]
    ListFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

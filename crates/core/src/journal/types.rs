use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a recording as it moves through the pipeline.
///
/// Only terminal statuses are journaled; `Processing` exists for
/// in-memory reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Processing,
    Completed,
    Error,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// One journaled outcome for a single recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingRecord {
    /// Database-assigned row id; 0 before insertion.
    #[serde(default)]
    pub id: i64,
    /// Path of the source recording as discovered.
    pub source_file: String,
    /// Path of the transcoded artifact, when one was produced.
    pub output_file: Option<String>,
    /// Public URL of the uploaded object, when the upload succeeded.
    pub remote_url: Option<String>,
    /// When the terminal state was reached.
    pub processed_at: DateTime<Utc>,
    pub status: ProcessingStatus,
    /// Failure description for `Error` records.
    pub error: Option<String>,
}

impl ProcessingRecord {
    /// A successful outcome.
    pub fn completed(
        source_file: impl Into<String>,
        output_file: impl Into<String>,
        remote_url: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            source_file: source_file.into(),
            output_file: Some(output_file.into()),
            remote_url: Some(remote_url.into()),
            processed_at: Utc::now(),
            status: ProcessingStatus::Completed,
            error: None,
        }
    }

    /// A failed outcome; fields that were never produced stay empty.
    pub fn failed(source_file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: 0,
            source_file: source_file.into(),
            output_file: None,
            remote_url: None,
            processed_at: Utc::now(),
            status: ProcessingStatus::Error,
            error: Some(error.into()),
        }
    }

    pub fn with_output_file(mut self, output_file: impl Into<String>) -> Self {
        self.output_file = Some(output_file.into());
        self
    }

    pub fn with_remote_url(mut self, remote_url: impl Into<String>) -> Self {
        self.remote_url = Some(remote_url.into());
        self
    }
}

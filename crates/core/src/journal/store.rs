use chrono::{DateTime, Utc};
use thiserror::Error;

use super::types::{ProcessingRecord, ProcessingStatus};

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Only terminal statuses can be journaled, got {0:?}")]
    NonTerminalStatus(ProcessingStatus),
}

/// Filter for querying processing records
#[derive(Debug, Clone)]
pub struct RecordFilter {
    pub status: Option<ProcessingStatus>,
    pub source_file: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self {
            status: None,
            source_file: None,
            from: None,
            to: None,
            limit: 100,
            offset: 0,
        }
    }
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: ProcessingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }

    pub fn with_time_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

/// Trait for processing outcome storage
pub trait ProcessingJournal: Send + Sync {
    /// Append a terminal record, returns the assigned ID
    fn append(&self, record: &ProcessingRecord) -> Result<i64, JournalError>;

    /// Query records with optional filters, newest first
    fn query(&self, filter: &RecordFilter) -> Result<Vec<ProcessingRecord>, JournalError>;

    /// Count matching records
    fn count(&self, filter: &RecordFilter) -> Result<i64, JournalError>;
}

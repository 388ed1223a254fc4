use std::path::Path;
use std::sync::Mutex;

use chrono::DateTime;
use rusqlite::{params, Connection};

use super::{JournalError, ProcessingJournal, ProcessingRecord, ProcessingStatus, RecordFilter};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS processing_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        source_file TEXT NOT NULL,
        output_file TEXT,
        remote_url TEXT,
        processed_at TEXT NOT NULL,
        status TEXT NOT NULL,
        error TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_processing_log_processed_at ON processing_log(processed_at);
    CREATE INDEX IF NOT EXISTS idx_processing_log_status ON processing_log(status);
    CREATE INDEX IF NOT EXISTS idx_processing_log_source_file ON processing_log(source_file);
"#;

/// SQLite-backed processing journal
pub struct SqliteJournal {
    conn: Mutex<Connection>,
}

impl SqliteJournal {
    /// Open the journal, creating the database file and table if needed
    pub fn new(path: &Path) -> Result<Self, JournalError> {
        let conn = Connection::open(path).map_err(|e| JournalError::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| JournalError::Database(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory journal (useful for testing)
    pub fn in_memory() -> Result<Self, JournalError> {
        let conn =
            Connection::open_in_memory().map_err(|e| JournalError::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| JournalError::Database(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn build_where_clause(filter: &RecordFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            params.push(Box::new(status.as_str()));
        }

        if let Some(ref source_file) = filter.source_file {
            conditions.push("source_file = ?");
            params.push(Box::new(source_file.clone()));
        }

        if let Some(ref from) = filter.from {
            conditions.push("processed_at >= ?");
            params.push(Box::new(from.to_rfc3339()));
        }

        if let Some(ref to) = filter.to {
            conditions.push("processed_at <= ?");
            params.push(Box::new(to.to_rfc3339()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }
}

impl ProcessingJournal for SqliteJournal {
    fn append(&self, record: &ProcessingRecord) -> Result<i64, JournalError> {
        if !record.status.is_terminal() {
            return Err(JournalError::NonTerminalStatus(record.status));
        }

        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO processing_log (source_file, output_file, remote_url, processed_at, status, error) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                record.source_file,
                record.output_file,
                record.remote_url,
                record.processed_at.to_rfc3339(),
                record.status.as_str(),
                record.error,
            ],
        )
        .map_err(|e| JournalError::Database(e.to_string()))?;

        Ok(conn.last_insert_rowid())
    }

    fn query(&self, filter: &RecordFilter) -> Result<Vec<ProcessingRecord>, JournalError> {
        let conn = self.conn.lock().unwrap();

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!(
            "SELECT id, source_file, output_file, remote_url, processed_at, status, error FROM processing_log {} ORDER BY id DESC LIMIT ? OFFSET ?",
            where_clause
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| JournalError::Database(e.to_string()))?;

        let mut all_params: Vec<Box<dyn rusqlite::ToSql>> = params;
        all_params.push(Box::new(filter.limit));
        all_params.push(Box::new(filter.offset));

        let param_refs: Vec<&dyn rusqlite::ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                let id: i64 = row.get(0)?;
                let source_file: String = row.get(1)?;
                let output_file: Option<String> = row.get(2)?;
                let remote_url: Option<String> = row.get(3)?;
                let processed_at: String = row.get(4)?;
                let status: String = row.get(5)?;
                let error: Option<String> = row.get(6)?;

                Ok((
                    id,
                    source_file,
                    output_file,
                    remote_url,
                    processed_at,
                    status,
                    error,
                ))
            })
            .map_err(|e| JournalError::Database(e.to_string()))?;

        let mut records = Vec::new();
        for row_result in rows {
            let (id, source_file, output_file, remote_url, processed_at, status, error) =
                row_result.map_err(|e| JournalError::Database(e.to_string()))?;

            let processed_at = DateTime::parse_from_rfc3339(&processed_at)
                .map_err(|e| JournalError::Database(format!("Invalid timestamp: {}", e)))?
                .into();

            let status = ProcessingStatus::parse(&status)
                .ok_or_else(|| JournalError::Database(format!("Unknown status: {}", status)))?;

            records.push(ProcessingRecord {
                id,
                source_file,
                output_file,
                remote_url,
                processed_at,
                status,
                error,
            });
        }

        Ok(records)
    }

    fn count(&self, filter: &RecordFilter) -> Result<i64, JournalError> {
        let conn = self.conn.lock().unwrap();

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!("SELECT COUNT(*) FROM processing_log {}", where_clause);

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(|e| JournalError::Database(e.to_string()))
    }
}

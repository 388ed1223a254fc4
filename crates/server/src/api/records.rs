//! Processing journal query endpoint.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use courier_core::{ProcessingRecord, ProcessingStatus, RecordFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// Maximum allowed limit for record queries
const MAX_LIMIT: i64 = 1000;

/// Default limit for record queries
const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for the records endpoint
#[derive(Debug, Deserialize)]
pub struct RecordQueryParams {
    /// Filter by terminal status ("completed" or "error")
    pub status: Option<String>,
    /// Filter by exact source file path
    pub source_file: Option<String>,
    /// Records processed after this timestamp (ISO 8601)
    pub from: Option<DateTime<Utc>>,
    /// Records processed before this timestamp (ISO 8601)
    pub to: Option<DateTime<Utc>>,
    /// Maximum number of records to return (default 100, max 1000)
    pub limit: Option<i64>,
    /// Pagination offset (default 0)
    pub offset: Option<i64>,
}

/// Response for the records endpoint
#[derive(Debug, Serialize)]
pub struct RecordQueryResponse {
    pub records: Vec<ProcessingRecord>,
    /// Total number of matching records
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct RecordErrorResponse {
    pub error: String,
}

/// Query journaled processing outcomes, newest first
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordQueryParams>,
) -> Result<Json<RecordQueryResponse>, impl IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut base_filter = RecordFilter::new();

    if let Some(ref status) = params.status {
        match ProcessingStatus::parse(status) {
            Some(status) => base_filter = base_filter.with_status(status),
            None => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(RecordErrorResponse {
                        error: format!("Unknown status: {}", status),
                    }),
                ));
            }
        }
    }

    if let Some(ref source_file) = params.source_file {
        base_filter = base_filter.with_source_file(source_file);
    }

    if params.from.is_some() || params.to.is_some() {
        base_filter = base_filter.with_time_range(params.from, params.to);
    }

    let query_filter = RecordFilter {
        limit,
        offset,
        ..base_filter.clone()
    };

    let records = match state.journal().query(&query_filter) {
        Ok(records) => records,
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RecordErrorResponse {
                    error: format!("Failed to query records: {}", e),
                }),
            ));
        }
    };

    let total = match state.journal().count(&base_filter) {
        Ok(count) => count,
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RecordErrorResponse {
                    error: format!("Failed to count records: {}", e),
                }),
            ));
        }
    };

    Ok(Json(RecordQueryResponse {
        records,
        total,
        limit,
        offset,
    }))
}

//! Manual batch trigger endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use courier_core::{BatchError, BatchReport};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProcessErrorResponse {
    pub error: String,
}

/// Runs one batch synchronously and returns its report.
///
/// A run already in flight yields 409 rather than queueing a second
/// one. Per-file failures do not fail the request; they are visible in
/// the report counts and the journal.
pub async fn trigger_run(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BatchReport>, impl IntoResponse> {
    match state.pipeline().run_batch(state.cancel_token()).await {
        Ok(report) => Ok(Json(report)),
        Err(BatchError::AlreadyRunning) => Err((
            StatusCode::CONFLICT,
            Json(ProcessErrorResponse {
                error: BatchError::AlreadyRunning.to_string(),
            }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ProcessErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

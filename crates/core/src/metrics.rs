//! Prometheus metrics for core components.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

/// Batch runs total by result.
pub static BATCH_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("courier_batch_runs_total", "Total batch runs"),
        &["result"], // "completed", "failed", "skipped"
    )
    .unwrap()
});

/// Files processed total by result.
pub static FILES_PROCESSED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("courier_files_processed_total", "Total files processed"),
        &["result"], // "completed", "error"
    )
    .unwrap()
});

/// Upload PUT attempts total.
pub static UPLOAD_ATTEMPTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("courier_upload_attempts_total", "Total upload PUT attempts").unwrap()
});

/// Upload retries total (attempts after the first).
pub static UPLOAD_RETRIES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("courier_upload_retries_total", "Total upload retries").unwrap()
});

/// Upload duration in seconds.
pub static UPLOAD_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("courier_upload_duration_seconds", "Duration of uploads")
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Returns all core metric collectors for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(BATCH_RUNS.clone()),
        Box::new(FILES_PROCESSED.clone()),
        Box::new(UPLOAD_ATTEMPTS.clone()),
        Box::new(UPLOAD_RETRIES.clone()),
        Box::new(UPLOAD_DURATION.clone()),
    ]
}

//! Ingest pipeline.
//!
//! Drives recordings through the processing stages:
//! discovery, conversion, upload, relocation, journaling.
//!
//! Files are isolated from each other: one failing file is journaled
//! and the batch moves on. Only batch-level problems (the inbox being
//! unreadable, the processed directory being unavailable, a run
//! already in flight) abort a run.

mod config;
mod runner;
mod scheduler;
mod types;

pub use config::PipelineConfig;
pub use runner::IngestPipeline;
pub use scheduler::PipelineScheduler;
pub use types::{BatchError, BatchReport};

//! Periodic batch scheduling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::runner::IngestPipeline;
use super::types::BatchError;

/// Runs batches on a fixed interval until stopped.
///
/// An interval tick that lands while a manually triggered run is in
/// flight is dropped, not queued; the next tick picks up whatever is
/// left in the inbox.
pub struct PipelineScheduler {
    pipeline: Arc<IngestPipeline>,
    interval: Duration,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    cancel: CancellationToken,
}

impl PipelineScheduler {
    pub fn new(pipeline: Arc<IngestPipeline>, interval: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            pipeline,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// Cancellation token honored by in-flight batch work.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Starts the scheduling loop (spawns a background task).
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Scheduler already running");
            return;
        }

        let pipeline = Arc::clone(&self.pipeline);
        let interval = self.interval;
        let running = Arc::clone(&self.running);
        let cancel = self.cancel.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "scheduler started");
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("scheduler received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        match pipeline.run_batch(&cancel).await {
                            Ok(_) => {}
                            Err(BatchError::AlreadyRunning) => {
                                info!("skipping scheduled run, a batch is already in progress");
                            }
                            Err(e) => {
                                warn!(error = %e, "scheduled batch run failed");
                            }
                        }
                    }
                }
            }
            info!("scheduler loop exited");
        });
    }

    /// Stops the loop and cancels in-flight batch work.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Scheduler not running");
            return;
        }

        info!("stopping scheduler");
        self.cancel.cancel();
        let _ = self.shutdown_tx.send(());
    }
}

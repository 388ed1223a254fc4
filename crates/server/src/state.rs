use std::sync::Arc;

use courier_core::{Config, IngestPipeline, ProcessingJournal, SanitizedConfig};
use tokio_util::sync::CancellationToken;

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: Arc<IngestPipeline>,
    journal: Arc<dyn ProcessingJournal>,
    cancel: CancellationToken,
}

impl AppState {
    pub fn new(
        config: Config,
        pipeline: Arc<IngestPipeline>,
        journal: Arc<dyn ProcessingJournal>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            pipeline,
            journal,
            cancel,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pipeline(&self) -> &Arc<IngestPipeline> {
        &self.pipeline
    }

    pub fn journal(&self) -> &dyn ProcessingJournal {
        self.journal.as_ref()
    }

    /// Token cancelled on shutdown; manual runs honor it too.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

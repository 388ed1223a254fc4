//! Trait definitions for the uploader module.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors surfaced by an object store backend.
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// The PUT request failed (network, throttling, server error).
    #[error("PUT failed for key {key}: {reason}")]
    PutFailed { key: String, reason: String },
}

/// A store that can durably persist bytes under a key.
///
/// Overwriting the same key is safe, so retrying a PUT is always sound.
/// This is the seam that lets retry behavior be tested without a live
/// network dependency.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Durably stores `body` under `key`. One call is one PUT.
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), ObjectStoreError>;
}

//! Retrying uploader built on top of an [`ObjectStore`].

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::metrics::{UPLOAD_ATTEMPTS, UPLOAD_DURATION, UPLOAD_RETRIES};

use super::error::UploadError;
use super::source::UploadSource;
use super::traits::ObjectStore;

/// Retry policy for uploads.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Total number of PUT attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each attempt after.
    pub base_delay: Duration,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Uploads a byte source to an object store with bounded retries.
///
/// The store seam keeps this independent of any concrete backend, so
/// the retry loop can be exercised with an in-memory store.
pub struct Uploader {
    store: Arc<dyn ObjectStore>,
    policy: UploadPolicy,
    public_base_url: String,
}

impl Uploader {
    /// Creates an uploader whose public URLs are rooted at
    /// `<endpoint>/<bucket>`.
    pub fn new(store: Arc<dyn ObjectStore>, policy: UploadPolicy, endpoint: &str, bucket: &str) -> Self {
        Self {
            store,
            policy,
            public_base_url: format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
        }
    }

    /// The URL the object will be reachable at once uploaded.
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    /// Uploads `source` under `key`, retrying transient failures.
    ///
    /// Between attempts the source is rewound; a source that cannot
    /// rewind fails immediately rather than resending partial data.
    /// Cancellation is honored both during a PUT and during backoff.
    /// Returns the public URL of the stored object.
    pub async fn upload(
        &self,
        source: &mut dyn UploadSource,
        key: &str,
        content_type: &str,
        cancel: &CancellationToken,
    ) -> Result<String, UploadError> {
        let start = std::time::Instant::now();
        let result = self.upload_inner(source, key, content_type, cancel).await;
        let label = if result.is_ok() { "success" } else { "failed" };
        UPLOAD_DURATION
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());
        result
    }

    async fn upload_inner(
        &self,
        source: &mut dyn UploadSource,
        key: &str,
        content_type: &str,
        cancel: &CancellationToken,
    ) -> Result<String, UploadError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let body = source.read_to_end().await?;
            UPLOAD_ATTEMPTS.inc();

            let put_result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(UploadError::Cancelled),
                res = self.store.put_object(key, body, content_type) => res,
            };

            let failure = match put_result {
                Ok(()) => {
                    debug!(key = %key, attempt, "upload succeeded");
                    return Ok(self.object_url(key));
                }
                Err(e) => e,
            };

            if attempt >= self.policy.max_attempts {
                return Err(UploadError::Exhausted {
                    attempts: attempt,
                    source: failure,
                });
            }

            if !source.rewind().await? {
                return Err(UploadError::NotRewindable { source: failure });
            }

            let delay = self.policy.base_delay * 2u32.pow(attempt - 1);
            warn!(
                key = %key,
                attempt,
                error = %failure,
                retry_in_ms = delay.as_millis() as u64,
                "upload attempt failed, retrying"
            );
            UPLOAD_RETRIES.inc();

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(UploadError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

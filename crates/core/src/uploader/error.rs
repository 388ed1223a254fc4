//! Error types for the uploader module.

use thiserror::Error;

use super::traits::ObjectStoreError;

/// Errors that can occur during an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// All attempts were consumed; wraps the last underlying failure.
    #[error("Upload failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: ObjectStoreError,
    },

    /// The source cannot be rewound, so a retry would resend partial or
    /// no data. Carries the failure that triggered the retry.
    #[error("Cannot retry upload: source is not rewindable: {source}")]
    NotRewindable {
        #[source]
        source: ObjectStoreError,
    },

    /// The deadline or cancellation fired before the upload finished.
    #[error("Upload cancelled")]
    Cancelled,

    /// Failed to read the upload source.
    #[error("Failed to read upload source: {0}")]
    Io(#[from] std::io::Error),
}

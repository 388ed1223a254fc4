//! Error types for the transcoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum TranscoderError {
    /// Transcoder binary not found.
    #[error("Transcoder not found at path: {path}")]
    CommandNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// The external tool exited with a nonzero status.
    #[error("Conversion failed (exit code {code:?}): {output}")]
    ExitFailure { code: Option<i32>, output: String },

    /// The tool reported success but the artifact is missing.
    /// Distinct from ExitFailure: the exit code alone is not trusted
    /// as a completion proof.
    #[error("Conversion completed but output file not found: {path}")]
    MissingArtifact { path: PathBuf },

    /// Conversion timed out.
    #[error("Conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

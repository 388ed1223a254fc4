//! Error types for the relocator module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while relocating a file.
#[derive(Debug, Error)]
pub enum RelocateError {
    /// The source file has no usable file name component.
    #[error("Source path has no file name: {path}")]
    InvalidSource { path: PathBuf },

    /// Creating the destination directory failed.
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rename itself failed.
    #[error("Failed to move {from} to {to}: {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! Trait definitions for the transcoder module.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::error::TranscoderError;

/// A transcoder that converts one recorded segment into one artifact.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Converts the input file, returning the absolute path of the artifact.
    ///
    /// The output path is derived from the input path by swapping the
    /// extension; implementations must verify the artifact exists before
    /// reporting success.
    async fn convert(&self, input: &Path) -> Result<PathBuf, TranscoderError>;
}

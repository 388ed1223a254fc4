//! Trait definitions for the relocator module.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::error::RelocateError;

/// Moves a file into a destination directory.
#[async_trait]
pub trait Relocator: Send + Sync {
    /// Returns the name of this relocator implementation.
    fn name(&self) -> &str;

    /// Moves `source` into `dest_dir` under its original file name.
    ///
    /// Returns the final path of the moved file.
    async fn relocate(&self, source: &Path, dest_dir: &Path) -> Result<PathBuf, RelocateError>;
}

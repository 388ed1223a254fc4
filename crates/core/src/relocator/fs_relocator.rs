//! File system relocator implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::error::RelocateError;
use super::traits::Relocator;

/// Relocator that renames files within the local file system.
///
/// Rename is atomic on the same file system. There is deliberately no
/// copy fallback: the inbox and processed directory are expected to
/// share a file system, and a cross-device failure should surface.
#[derive(Default)]
pub struct FsRelocator;

impl FsRelocator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Relocator for FsRelocator {
    fn name(&self) -> &str {
        "fs"
    }

    async fn relocate(&self, source: &Path, dest_dir: &Path) -> Result<PathBuf, RelocateError> {
        let file_name = source
            .file_name()
            .ok_or_else(|| RelocateError::InvalidSource {
                path: source.to_path_buf(),
            })?;

        fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| RelocateError::DirectoryCreationFailed {
                path: dest_dir.to_path_buf(),
                source: e,
            })?;

        let destination = dest_dir.join(file_name);
        fs::rename(source, &destination)
            .await
            .map_err(|e| RelocateError::RenameFailed {
                from: source.to_path_buf(),
                to: destination.clone(),
                source: e,
            })?;

        debug!(
            from = %source.display(),
            to = %destination.display(),
            "relocated file"
        );

        Ok(destination)
    }
}

//! Upload byte sources.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// A byte source for one upload.
///
/// Retrying a PUT requires replaying the body from the start; a source
/// that cannot rewind makes retries unsound.
#[async_trait]
pub trait UploadSource: Send {
    /// Reads all bytes from the current position to the end.
    async fn read_to_end(&mut self) -> std::io::Result<Bytes>;

    /// Rewinds to the start of the source for a retry.
    ///
    /// Returns `false` when the source does not support rewinding.
    async fn rewind(&mut self) -> std::io::Result<bool>;
}

/// File-backed source; rewindable via seek.
pub struct FileSource {
    file: File,
}

impl FileSource {
    /// Opens the file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self { file })
    }
}

#[async_trait]
impl UploadSource for FileSource {
    async fn read_to_end(&mut self) -> std::io::Result<Bytes> {
        let mut buf = Vec::new();
        self.file.read_to_end(&mut buf).await?;
        Ok(Bytes::from(buf))
    }

    async fn rewind(&mut self) -> std::io::Result<bool> {
        self.file.rewind().await?;
        Ok(true)
    }
}

/// In-memory source; trivially rewindable.
pub struct BytesSource {
    data: Bytes,
    consumed: bool,
}

impl BytesSource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            consumed: false,
        }
    }
}

#[async_trait]
impl UploadSource for BytesSource {
    async fn read_to_end(&mut self) -> std::io::Result<Bytes> {
        if self.consumed {
            return Ok(Bytes::new());
        }
        self.consumed = true;
        Ok(self.data.clone())
    }

    async fn rewind(&mut self) -> std::io::Result<bool> {
        self.consumed = false;
        Ok(true)
    }
}

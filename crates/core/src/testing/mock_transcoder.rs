//! Mock transcoder for tests.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::transcoder::{Transcoder, TranscoderError};

/// Transcoder that writes a small artifact next to the input, with
/// per-input failure injection keyed on path substrings.
pub struct MockTranscoder {
    output_ext: String,
    calls: Mutex<Vec<PathBuf>>,
    fail_substrings: Mutex<Vec<String>>,
    missing_artifact_substrings: Mutex<Vec<String>>,
}

impl MockTranscoder {
    pub fn new() -> Self {
        Self {
            output_ext: "opus".to_string(),
            calls: Mutex::new(Vec::new()),
            fail_substrings: Mutex::new(Vec::new()),
            missing_artifact_substrings: Mutex::new(Vec::new()),
        }
    }

    /// Inputs whose path contains `substr` fail with a nonzero exit.
    pub fn fail_on(self, substr: impl Into<String>) -> Self {
        self.fail_substrings.lock().unwrap().push(substr.into());
        self
    }

    /// Inputs whose path contains `substr` exit cleanly but produce
    /// no artifact.
    pub fn missing_artifact_on(self, substr: impl Into<String>) -> Self {
        self.missing_artifact_substrings
            .lock()
            .unwrap()
            .push(substr.into());
        self
    }

    /// Inputs seen so far, in call order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(&self, input: &Path) -> Result<PathBuf, TranscoderError> {
        self.calls.lock().unwrap().push(input.to_path_buf());

        let path_str = input.to_string_lossy();
        let output = input.with_extension(&self.output_ext);

        if self
            .fail_substrings
            .lock()
            .unwrap()
            .iter()
            .any(|s| path_str.contains(s.as_str()))
        {
            return Err(TranscoderError::ExitFailure {
                code: Some(1),
                output: "injected failure".to_string(),
            });
        }

        if self
            .missing_artifact_substrings
            .lock()
            .unwrap()
            .iter()
            .any(|s| path_str.contains(s.as_str()))
        {
            return Err(TranscoderError::MissingArtifact { path: output });
        }

        tokio::fs::write(&output, b"opus data").await?;
        Ok(output)
    }
}

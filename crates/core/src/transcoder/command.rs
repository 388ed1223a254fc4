//! Command-line transcoder implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

use crate::config::TranscoderConfig;

use super::error::TranscoderError;
use super::traits::Transcoder;

/// Transcoder backed by an external binary invoked as `command <input> <output>`.
pub struct CommandTranscoder {
    command: PathBuf,
    timeout_secs: u64,
    output_ext: String,
}

impl CommandTranscoder {
    /// Creates a new command transcoder.
    pub fn new(config: &TranscoderConfig, output_ext: impl Into<String>) -> Self {
        Self {
            command: config.command.clone(),
            timeout_secs: config.timeout_secs,
            output_ext: output_ext.into(),
        }
    }

    /// Derives the artifact path by swapping the input extension.
    fn output_path(&self, input: &Path) -> PathBuf {
        input.with_extension(&self.output_ext)
    }
}

#[async_trait]
impl Transcoder for CommandTranscoder {
    fn name(&self) -> &str {
        "command"
    }

    async fn convert(&self, input: &Path) -> Result<PathBuf, TranscoderError> {
        if !input.exists() {
            return Err(TranscoderError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        // Absolute paths so the tool's working directory cannot affect
        // where the artifact lands.
        let abs_input = std::path::absolute(input)?;
        let abs_output = std::path::absolute(self.output_path(input))?;

        debug!(
            input = %abs_input.display(),
            output = %abs_output.display(),
            "Invoking transcoder"
        );

        let run = Command::new(&self.command)
            .arg(&abs_input)
            .arg(&abs_output)
            .kill_on_drop(true)
            .output();

        let output = match timeout(Duration::from_secs(self.timeout_secs), run).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    return Err(TranscoderError::CommandNotFound {
                        path: self.command.clone(),
                    });
                }
                return Err(TranscoderError::Io(e));
            }
            Err(_) => {
                return Err(TranscoderError::Timeout {
                    timeout_secs: self.timeout_secs,
                });
            }
        };

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(TranscoderError::ExitFailure {
                code: output.status.code(),
                output: combined.trim().to_string(),
            });
        }

        // Zero exit alone is not proof of completion.
        if !abs_output.exists() {
            return Err(TranscoderError::MissingArtifact { path: abs_output });
        }

        info!(
            input = %abs_input.display(),
            output = %abs_output.display(),
            "Conversion succeeded"
        );

        Ok(abs_output)
    }
}

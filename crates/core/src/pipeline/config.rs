//! Pipeline configuration.

use std::path::PathBuf;

use crate::config::Config;

/// Paths and naming conventions for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory scanned for new recordings (non-recursive).
    pub recordings_path: PathBuf,
    /// Directory processed source files are moved into.
    pub processed_path: PathBuf,
    /// Extension of source recordings, without the dot.
    pub source_ext: String,
    /// Extension of transcoded artifacts, without the dot.
    pub output_ext: String,
    /// Object key prefix, without a trailing slash.
    pub key_prefix: String,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            recordings_path: config.recordings.recordings_path.clone(),
            processed_path: config.recordings.processed_path(),
            source_ext: config.recordings.source_ext.clone(),
            output_ext: config.recordings.output_ext.clone(),
            key_prefix: config.storage.key_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Suffix a file name must carry to be picked up by discovery.
    ///
    /// Only the audio track of a recording is processed; video tracks
    /// and unrelated files in the inbox are ignored.
    pub fn candidate_suffix(&self) -> String {
        format!("-audio.{}", self.source_ext)
    }

    /// Content type uploaded artifacts are tagged with.
    pub fn content_type(&self) -> &'static str {
        match self.output_ext.as_str() {
            "opus" | "ogg" | "oga" => "audio/ogg",
            "wav" => "audio/wav",
            "mp3" => "audio/mpeg",
            _ => "application/octet-stream",
        }
    }

    /// Object key for an artifact file name.
    pub fn object_key(&self, file_name: &str) -> String {
        if self.key_prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.key_prefix, file_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig {
            recordings_path: PathBuf::from("/recordings"),
            processed_path: PathBuf::from("/recordings/processed"),
            source_ext: "mjr".to_string(),
            output_ext: "opus".to_string(),
            key_prefix: "recordings".to_string(),
        }
    }

    #[test]
    fn test_candidate_suffix() {
        assert_eq!(config().candidate_suffix(), "-audio.mjr");
    }

    #[test]
    fn test_content_type_for_opus() {
        assert_eq!(config().content_type(), "audio/ogg");
    }

    #[test]
    fn test_object_key_with_and_without_prefix() {
        assert_eq!(config().object_key("a.opus"), "recordings/a.opus");

        let mut bare = config();
        bare.key_prefix = String::new();
        assert_eq!(bare.object_key("a.opus"), "a.opus");
    }
}

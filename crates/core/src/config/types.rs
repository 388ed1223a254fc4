use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub recordings: RecordingsConfig,
    #[serde(default)]
    pub transcoder: TranscoderConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("courier.db")
}

/// Recordings directory layout
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordingsConfig {
    /// Directory scanned (non-recursively) for recorded segments
    pub recordings_path: PathBuf,
    /// Directory receiving relocated originals (default: `<recordings_path>/processed`)
    #[serde(default)]
    pub processed_path: Option<PathBuf>,
    /// Extension of recorded segments
    #[serde(default = "default_source_ext")]
    pub source_ext: String,
    /// Extension of transcoded artifacts
    #[serde(default = "default_output_ext")]
    pub output_ext: String,
}

impl RecordingsConfig {
    /// Effective processed directory, applying the default when unset
    pub fn processed_path(&self) -> PathBuf {
        self.processed_path
            .clone()
            .unwrap_or_else(|| self.recordings_path.join("processed"))
    }
}

fn default_source_ext() -> String {
    "mjr".to_string()
}

fn default_output_ext() -> String {
    "opus".to_string()
}

/// External transcoder invocation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscoderConfig {
    /// Path to the post-processing executable
    #[serde(default = "default_command")]
    pub command: PathBuf,
    /// Maximum wall-clock time for one conversion
    #[serde(default = "default_transcode_timeout")]
    pub timeout_secs: u64,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            timeout_secs: default_transcode_timeout(),
        }
    }
}

fn default_command() -> PathBuf {
    PathBuf::from("janus-pp-rec")
}

fn default_transcode_timeout() -> u64 {
    300
}

/// S3-compatible object storage
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Endpoint URL, e.g. "https://<account>.r2.cloudflarestorage.com"
    pub endpoint: String,
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Key prefix for uploaded artifacts
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_key_prefix() -> String {
    "recordings".to_string()
}

/// Periodic batch scheduling
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// When disabled, batches only run via the manual trigger endpoint
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    60
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub recordings: RecordingsConfig,
    pub transcoder: TranscoderConfig,
    pub storage: SanitizedStorageConfig,
    pub scheduler: SchedulerConfig,
}

/// Storage config with credentials hidden
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub key_prefix: String,
    pub credentials_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            recordings: config.recordings.clone(),
            transcoder: config.transcoder.clone(),
            storage: SanitizedStorageConfig {
                endpoint: config.storage.endpoint.clone(),
                bucket: config.storage.bucket.clone(),
                region: config.storage.region.clone(),
                key_prefix: config.storage.key_prefix.clone(),
                credentials_configured: !config.storage.access_key_id.is_empty()
                    && !config.storage.secret_access_key.is_empty(),
            },
            scheduler: config.scheduler.clone(),
        }
    }
}

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Storage endpoint and bucket are non-empty
/// - Scheduler interval is non-zero when enabled
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.storage.endpoint.is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.endpoint cannot be empty".to_string(),
        ));
    }

    if config.storage.bucket.is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.bucket cannot be empty".to_string(),
        ));
    }

    if config.recordings.source_ext.is_empty() || config.recordings.output_ext.is_empty() {
        return Err(ConfigError::ValidationError(
            "recordings.source_ext and recordings.output_ext cannot be empty".to_string(),
        ));
    }

    if config.scheduler.enabled && config.scheduler.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "scheduler.interval_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Probe and conversion timeouts are not 0
/// - Tool paths are not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.probe.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "probe.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.conversion.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "conversion.timeout_secs cannot be 0".to_string(),
        ));
    }

    for (name, path) in config.tools.entries() {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "tools.{} cannot be empty",
                name
            )));
        }
    }

    Ok(())
}

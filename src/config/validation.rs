use crate::ConfigError;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Converts the configured delay to a `Duration`
///
/// The delay must be a finite, non-negative number of seconds.
pub fn validate_delay(seconds: f64) -> Result<Duration, ConfigError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay must be a non-negative number of seconds, got {}",
            seconds
        )));
    }

    Duration::try_from_secs_f64(seconds).map_err(|e| {
        ConfigError::Validation(format!("delay of {} seconds is out of range: {}", seconds, e))
    })
}

/// Validates that a path setting is not empty
pub fn validate_path(name: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }
    Ok(())
}

/// Validates an endpoint base URL and returns it without a trailing slash
pub fn validate_base_url(name: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            name, value
        )));
    }

    Ok(value.trim_end_matches('/').to_string())
}

use crate::catalog::{DEFAULT_API_BASE, DEFAULT_AUTH_BASE};
use crate::config::credential::CredentialSource;
use crate::config::types::{
    FileConfig, Overrides, Settings, DEFAULT_DELAY_SECS, DEFAULT_LOG_FILE, DEFAULT_OUTPUT_DIR,
};
use crate::config::validation::{validate_base_url, validate_delay, validate_path};
use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Loads and parses a TOML config file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(FileConfig)` - Successfully parsed file
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Merges command-line values over the config file over the defaults
///
/// Fails when no credential can be resolved or a value is invalid. No
/// network activity happens here.
pub fn resolve_settings(
    overrides: Overrides,
    file: Option<FileConfig>,
) -> Result<Settings, ConfigError> {
    let file = file.unwrap_or_default();

    let output_dir = overrides
        .output_dir
        .or(file.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    validate_path("output_dir", &output_dir)?;

    let log_file = overrides
        .log_file
        .or(file.log_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    validate_path("log_file", &log_file)?;

    let delay = validate_delay(overrides.delay.or(file.delay).unwrap_or(DEFAULT_DELAY_SECS))?;

    let api_base = validate_base_url(
        "api_base",
        overrides
            .api_base
            .as_deref()
            .or(file.api_base.as_deref())
            .unwrap_or(DEFAULT_API_BASE),
    )?;
    let auth_base = validate_base_url(
        "auth_base",
        overrides
            .auth_base
            .as_deref()
            .or(file.auth_base.as_deref())
            .unwrap_or(DEFAULT_AUTH_BASE),
    )?;

    let dedupe = overrides.dedupe || file.dedupe.unwrap_or(false);

    let credential = CredentialSource::from_parts(
        overrides.token.or(file.token),
        file.client_id,
        file.client_secret,
    )
    .ok_or(ConfigError::MissingCredential)?;

    Ok(Settings {
        output_dir,
        delay,
        log_file,
        api_base,
        auth_base,
        dedupe,
        credential,
    })
}

/// Loads the config file named in `overrides`, if any, and resolves settings
pub fn load_settings(overrides: Overrides) -> Result<Settings, ConfigError> {
    let file = match &overrides.config_file {
        Some(path) => Some(load_file_config(path)?),
        None => None,
    };
    resolve_settings(overrides, file)
}

use crate::config::credential::CredentialSource;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default directory for record files
pub const DEFAULT_OUTPUT_DIR: &str = "icd_data";

/// Default pause after each node, in seconds
pub const DEFAULT_DELAY_SECS: f64 = 0.5;

/// Default log file path
pub const DEFAULT_LOG_FILE: &str = "icd_api.log";

/// Contents of the optional TOML config file
///
/// Every key is optional; command-line flags take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Bearer token for the catalog API
    pub token: Option<String>,

    /// OAuth2 client id, used when no token is given
    pub client_id: Option<String>,

    /// OAuth2 client secret, used when no token is given
    pub client_secret: Option<String>,

    /// Directory the record files are written to
    pub output_dir: Option<PathBuf>,

    /// Pause after each node, in seconds
    pub delay: Option<f64>,

    /// Log file path
    pub log_file: Option<PathBuf>,

    /// Base URL of the catalog API
    pub api_base: Option<String>,

    /// Base URL of the token service
    pub auth_base: Option<String>,

    /// Skip codes already visited in this run
    pub dedupe: Option<bool>,
}

/// Values given on the command line
///
/// `None` means "not given", so the config file or the default applies.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub delay: Option<f64>,
    pub log_file: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub api_base: Option<String>,
    pub auth_base: Option<String>,
    pub dedupe: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub delay: Duration,
    pub log_file: PathBuf,
    pub api_base: String,
    pub auth_base: String,
    pub dedupe: bool,
    pub credential: CredentialSource,
}

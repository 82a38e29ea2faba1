//! Configuration module for icd-harvest
//!
//! This module merges command-line values, an optional TOML config file and
//! built-in defaults into one validated `Settings`, and resolves the bearer
//! credential the crawl runs with.
//!
//! # Example
//!
//! ```no_run
//! use icd_harvest::config::{load_settings, Overrides};
//! use std::path::PathBuf;
//!
//! let settings = load_settings(Overrides {
//!     config_file: Some(PathBuf::from("icd.toml")),
//!     ..Overrides::default()
//! })
//! .unwrap();
//! println!("Writing records to {}", settings.output_dir.display());
//! ```

mod credential;
mod parser;
mod types;
mod validation;

// Re-export types
pub use credential::CredentialSource;
pub use types::{
    FileConfig, Overrides, Settings, DEFAULT_DELAY_SECS, DEFAULT_LOG_FILE, DEFAULT_OUTPUT_DIR,
};

// Re-export parser functions
pub use parser::{load_file_config, load_settings, resolve_settings};

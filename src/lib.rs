//! icd-harvest: an ICD-10 catalog harvester
//!
//! This crate walks the WHO ICD-10 code tree through its REST API, depth first,
//! and writes every node's raw record to a JSON file keyed by its code.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod logging;
pub mod storage;

use thiserror::Error;

/// Main error type for startup failures
///
/// Per-node failures never surface here; the walker recovers from them
/// locally. Only problems that prevent a crawl from starting do.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Token exchange failed: {0}")]
    Auth(#[from] catalog::AuthError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("No credential available: provide a token, or a config file with client_id and client_secret")]
    MissingCredential,
}

/// Result type alias for startup operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogClient, Code, FetchError, NodeRecord};
pub use config::Settings;
pub use crawler::{harvest, run_crawl, CrawlReport, RateLimiter, WalkOptions, Walker};
pub use storage::{JsonFileStore, RecordStore, StoreError};

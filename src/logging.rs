//! Logging setup
//!
//! Builds the subscriber for a run as a `Dispatch` handle: console output
//! plus an append-only log file. The binary attaches the handle to the crawl
//! instead of installing a process-wide default.

use crate::HarvestError;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;
use tracing::Dispatch;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter for the given verbosity flags
///
/// `-q` keeps errors only; each `-v` lowers the crate's level by one step.
pub fn filter_for(verbose: u8, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    match verbose {
        0 => EnvFilter::new("icd_harvest=info,warn"),
        1 => EnvFilter::new("icd_harvest=debug,info"),
        2 => EnvFilter::new("icd_harvest=trace,debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Builds the logging handle for a run
///
/// # Arguments
///
/// * `log_file` - File the log lines are appended to (created if missing)
/// * `verbose` - Number of `-v` flags
/// * `quiet` - Whether `-q` was given
///
/// # Returns
///
/// * `Ok(Dispatch)` - Handle writing to console and log file
/// * `Err(HarvestError)` - The log file could not be opened
pub fn build_dispatch(log_file: &Path, verbose: u8, quiet: bool) -> Result<Dispatch, HarvestError> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| {
            HarvestError::Logging(format!("cannot open {}: {}", log_file.display(), e))
        })?;

    let subscriber = tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        );

    Ok(Dispatch::new(subscriber))
}

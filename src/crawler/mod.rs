//! Crawler module for walking the catalog tree
//!
//! This module contains the core crawling logic, including:
//! - Root discovery with a fixed fallback list
//! - Depth-first traversal with post-order throttling
//! - Request pacing

mod coordinator;
mod scheduler;
mod walker;


pub use coordinator::{
    fallback_root_codes, root_codes, run_crawl, CrawlReport, FALLBACK_ROOT_CODES,
};
pub use scheduler::{RateLimiter, Throttle};
pub use walker::{WalkOptions, WalkStats, Walker};

use crate::catalog::{build_http_client, CatalogClient};
use crate::config::Settings;
use crate::storage::JsonFileStore;
use crate::HarvestError;

/// Runs a complete harvest from resolved settings
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client
/// 2. Resolve the bearer token (one token exchange at most)
/// 3. Crawl every root into the output directory
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl ran to completion, whatever the number of
///   failed nodes
/// * `Err(HarvestError)` - The crawl could not start
pub async fn harvest(settings: &Settings) -> Result<CrawlReport, HarvestError> {
    let http = build_http_client()?;

    tracing::info!("Authenticating with {}", settings.credential.describe());
    let token = settings
        .credential
        .resolve(&http, &settings.auth_base)
        .await?;

    let client = CatalogClient::new(http, &settings.api_base, token);
    let store = JsonFileStore::new(&settings.output_dir);
    let limiter = RateLimiter::new(settings.delay);
    let options = WalkOptions {
        dedupe: settings.dedupe,
    };

    tracing::info!(
        "Writing records to {} with a {:?} delay between requests",
        settings.output_dir.display(),
        settings.delay
    );

    Ok(run_crawl(client, store, limiter, options).await)
}

//! Crawl coordinator - root discovery and run orchestration
//!
//! This module:
//! - Discovers the root codes from the catalog's top-level listing
//! - Falls back to the fixed chapter list when that listing is unusable
//! - Walks every root in order and reports the outcome

use crate::catalog::{Catalog, Code};
use crate::crawler::scheduler::Throttle;
use crate::crawler::walker::{WalkOptions, WalkStats, Walker};
use crate::storage::RecordStore;
use chrono::{DateTime, Utc};

/// ICD-10 chapters I to XXII, used when the root listing cannot be read
pub const FALLBACK_ROOT_CODES: [&str; 22] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII", "XIII", "XIV", "XV",
    "XVI", "XVII", "XVIII", "XIX", "XX", "XXI", "XXII",
];

/// Outcome of one crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub roots: Vec<Code>,
    pub stats: WalkStats,
}

impl CrawlReport {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// The fallback chapter codes as `Code`s
pub fn fallback_root_codes() -> Vec<Code> {
    FALLBACK_ROOT_CODES.iter().copied().map(Code::from).collect()
}

/// Determines the codes the crawl starts from
///
/// Fetches the root listing and returns its children in listing order.
/// When the fetch fails, or the listing has no usable child references,
/// the 22 chapter codes are returned instead, so the result is never empty.
/// The root listing itself is never saved.
pub async fn root_codes<C: Catalog>(catalog: &C) -> Vec<Code> {
    match catalog.fetch(&Code::root()).await {
        Ok(listing) => match listing.child_codes() {
            Some(codes) if !codes.is_empty() => return codes,
            _ => tracing::warn!("Root listing has no child references. Using default list."),
        },
        Err(_) => tracing::warn!("Error fetching root codes. Using default list."),
    }

    fallback_root_codes()
}

/// Runs a complete crawl
///
/// This function:
/// 1. Resolves the root codes
/// 2. Walks each root depth first, saving every fetched record
/// 3. Returns the counters of the run
///
/// Per-node failures are logged and counted; the crawl always runs over the
/// full root set.
///
/// # Example
///
/// ```no_run
/// use icd_harvest::catalog::{build_http_client, CatalogClient, DEFAULT_API_BASE};
/// use icd_harvest::{run_crawl, JsonFileStore, RateLimiter, WalkOptions};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CatalogClient::new(build_http_client()?, DEFAULT_API_BASE, "token");
/// let report = run_crawl(
///     client,
///     JsonFileStore::new("icd_data"),
///     RateLimiter::new(Duration::from_millis(500)),
///     WalkOptions::default(),
/// )
/// .await;
/// println!("{} records saved", report.stats.records_saved);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl<C, S, T>(catalog: C, store: S, throttle: T, options: WalkOptions) -> CrawlReport
where
    C: Catalog,
    S: RecordStore,
    T: Throttle,
{
    let started_at = Utc::now();
    tracing::info!("Starting ICD-10 data collection");

    let roots = root_codes(&catalog).await;
    tracing::info!(
        "Root codes: [{}]",
        roots
            .iter()
            .map(Code::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut walker = Walker::new(catalog, store, throttle, options);
    for root in &roots {
        walker.walk(root.clone()).await;
    }

    let report = CrawlReport {
        started_at,
        finished_at: Utc::now(),
        roots,
        stats: walker.stats(),
    };

    tracing::info!(
        "Data collection and saving complete: {} nodes visited, {} records saved, {} fetch failures, {} save failures in {}s",
        report.stats.nodes_visited,
        report.stats.records_saved,
        report.stats.fetch_failures,
        report.stats.save_failures,
        report.duration_seconds()
    );

    report
}

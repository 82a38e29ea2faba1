//! icd-harvest main entry point
//!
//! This is the command-line interface for the ICD-10 catalog harvester.

use anyhow::Context;
use clap::Parser;
use icd_harvest::config::{load_settings, Overrides, Settings};
use icd_harvest::logging::build_dispatch;
use icd_harvest::{harvest, CrawlReport};
use std::path::PathBuf;
use tracing::instrument::WithSubscriber;

/// icd-harvest: fetch and save ICD-10 data from the WHO API
///
/// Walks the ICD-10 code tree depth first and writes one JSON file per code.
/// Re-running overwrites existing files, so an interrupted harvest is
/// completed by running it again.
#[derive(Parser, Debug)]
#[command(name = "icd-harvest")]
#[command(version)]
#[command(about = "Fetch and save ICD-10 data from the WHO API", long_about = None)]
struct Cli {
    /// Bearer token for API authentication
    #[arg(long)]
    token: Option<String>,

    /// Directory to save the JSON files [default: icd_data]
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Delay between API requests in seconds [default: 0.5]
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Log file path [default: icd_api.log]
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// TOML configuration file (token, client_id, client_secret, ...)
    #[arg(long, value_name = "FILE")]
    config_file: Option<PathBuf>,

    /// Base URL of the catalog API
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Base URL of the token service
    #[arg(long, value_name = "URL")]
    auth_base: Option<String>,

    /// Visit each code at most once per run
    #[arg(long)]
    dedupe: bool,

    /// Resolve and print the configuration without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            token: self.token.clone(),
            output_dir: self.output_dir.clone(),
            delay: self.delay,
            log_file: self.log_file.clone(),
            config_file: self.config_file.clone(),
            api_base: self.api_base.clone(),
            auth_base: self.auth_base.clone(),
            dedupe: self.dedupe,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Resolve everything, credential included, before touching the network
    let settings = load_settings(cli.overrides()).context("Failed to load configuration")?;

    if cli.dry_run {
        print_dry_run(&settings);
        return Ok(());
    }

    let dispatch = build_dispatch(&settings.log_file, cli.verbose, cli.quiet)
        .context("Failed to set up logging")?;

    let report = harvest(&settings)
        .with_subscriber(dispatch)
        .await
        .context("Harvest could not start")?;

    if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}

/// Handles the --dry-run mode: shows the resolved configuration
fn print_dry_run(settings: &Settings) {
    println!("=== icd-harvest Dry Run ===\n");
    println!("Catalog API:   {}", settings.api_base);
    println!("Token service: {}", settings.auth_base);
    println!("Credential:    {}", settings.credential.describe());
    println!("Output dir:    {}", settings.output_dir.display());
    println!("Log file:      {}", settings.log_file.display());
    println!("Delay:         {:?}", settings.delay);
    println!("Dedupe:        {}", settings.dedupe);
    println!("\n✓ Configuration is valid");
}

fn print_report(report: &CrawlReport) {
    let stats = &report.stats;
    println!("=== Harvest Summary ===\n");
    println!("Roots:          {}", report.roots.len());
    println!("Nodes visited:  {}", stats.nodes_visited);
    println!("Records saved:  {}", stats.records_saved);
    println!("Fetch failures: {}", stats.fetch_failures);
    println!("Save failures:  {}", stats.save_failures);
    if stats.duplicates_skipped > 0 {
        println!("Duplicates:     {}", stats.duplicates_skipped);
    }
    println!("Duration:       {}s", report.duration_seconds());
}

//! Spinneret command-line interface
//!
//! Loads a TOML configuration, builds the crawl engine with the built-in
//! HTTP fetcher, and runs a crawl over the configured seed URLs.

use clap::Parser;
use spinneret::config::load_config;
use spinneret::{Crawler, HttpFetcher, MemoryCache};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Spinneret: a concurrent web-crawling engine
#[derive(Parser, Debug)]
#[command(name = "spinneret")]
#[command(version)]
#[command(about = "A concurrent web-crawling engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Cache fetched pages in memory for the duration of the run
    #[arg(long)]
    cache: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)?;

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let fetcher = Arc::new(HttpFetcher::new(&config.user_agent)?);
    let mut crawler =
        Crawler::new(config.crawler.clone(), fetcher).with_progress(config.progress.clone());
    if cli.cache {
        crawler = crawler.with_cache(Arc::new(MemoryCache::new()));
    }

    let stats = crawler.stats();
    crawler
        .crawl(
            &config.seeds,
            Arc::new(|result: spinneret::CrawlResult| match &result.error {
                Some(error) => {
                    tracing::warn!(url = %result.url, error = %error, "page failed")
                }
                None => {
                    tracing::info!(url = %result.url, links = result.links.len(), "page processed")
                }
            }),
        )
        .await?;

    let snapshot = stats.snapshot();
    println!(
        "Crawl complete: {} processed, {} succeeded, {} failed",
        snapshot.processed, snapshot.succeeded, snapshot.failed
    );

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("spinneret=info,warn"),
            1 => EnvFilter::new("spinneret=debug,info"),
            2 => EnvFilter::new("spinneret=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Prints the effective configuration without crawling
fn print_dry_run(config: &spinneret::Config) {
    println!("=== Spinneret Dry Run ===\n");

    println!("Crawler:");
    println!(
        "  Max pages: {}",
        if config.crawler.max_pages == 0 {
            "unbounded".to_string()
        } else {
            config.crawler.max_pages.to_string()
        }
    );
    println!("  Workers: {}", config.crawler.workers);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Queue size: {}", config.crawler.queue_size);
    println!("  Follow behavior: {:?}", config.crawler.follow);

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }
}

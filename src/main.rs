//! CrawlStars main entry point
//!
//! This is the command-line interface for the CrawlStars crawler.

use anyhow::Context;
use clap::Parser;
use crawlstars::config::{load_config_with_hash, validate, Config};
use crawlstars::crawler::Crawler;
use crawlstars::output::{load_statistics, print_report, print_search_results, print_statistics};
use crawlstars::storage::{PageStore, RunLog, SqliteStorage, DEFAULT_SEARCH_LIMIT};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// CrawlStars: a breadth-first web crawler with full-text search
///
/// Crawls outward from a seed URL with a pool of workers, saves each page's
/// title and text, and answers ranked searches over what was saved.
/// Settings come from an optional TOML file, then the environment
/// (DATABASE_PATH, SEED_URL, WORKERS, MAX_CRAWLS), then these flags.
#[derive(Parser, Debug)]
#[command(name = "crawlstars")]
#[command(version = "1.0.0")]
#[command(about = "A breadth-first web crawler with full-text search", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// URL to start crawling from
    #[arg(long)]
    seed: Option<String>,

    /// Number of concurrent workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Stop after this many fetch attempts
    #[arg(long)]
    max_crawls: Option<u64>,

    /// Path to the SQLite page store
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Search stored pages instead of crawling
    #[arg(long, value_name = "QUERY", conflicts_with_all = ["stats", "dry_run"])]
    search: Option<String>,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["search", "dry_run"])]
    stats: bool,

    /// Show the effective configuration without crawling
    #[arg(long, conflicts_with_all = ["search", "stats"])]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("CrawlStars is initializing...");
    let (mut config, config_hash) =
        load_config_with_hash(cli.config.as_deref()).context("Failed to load configuration")?;
    apply_cli_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;
    tracing::debug!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    tracing::info!("Target database: {}", config.storage.database_path);
    let storage = SqliteStorage::open(Path::new(&config.storage.database_path))
        .context("Failed to connect to page store")?;
    tracing::info!("Database connected");

    if let Some(query) = &cli.search {
        handle_search(&storage, query)?;
    } else if cli.stats {
        handle_stats(&storage)?;
    } else {
        handle_crawl(&config, storage, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawlstars=info,warn"),
            1 => EnvFilter::new("crawlstars=debug,info"),
            2 => EnvFilter::new("crawlstars=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Command-line flags win over the file and the environment
fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(seed) = &cli.seed {
        config.crawler.seed_url = seed.clone();
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(max_crawls) = cli.max_crawls {
        config.crawler.max_crawls = max_crawls;
    }
    if let Some(database) = &cli.database {
        config.storage.database_path = database.clone();
    }
}

fn handle_dry_run(config: &Config) {
    println!("=== CrawlStars Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Max crawls: {}", config.crawler.max_crawls);
    println!("  Frontier capacity: {}", config.crawler.frontier_capacity);
    println!("  Result buffer: {}", config.crawler.result_buffer);
    println!("  Idle timeout: {}ms", config.crawler.idle_timeout_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);

    println!("\n✓ Configuration is valid");
}

fn handle_search(storage: &SqliteStorage, query: &str) -> anyhow::Result<()> {
    tracing::info!("Searching for: {}", query);
    let hits = storage
        .search(query, DEFAULT_SEARCH_LIMIT)
        .context("Search failed")?;
    print_search_results(query, &hits);
    Ok(())
}

fn handle_stats(storage: &SqliteStorage) -> anyhow::Result<()> {
    let stats = load_statistics(storage).context("Failed to load statistics")?;
    print_statistics(&stats);
    Ok(())
}

async fn handle_crawl(
    config: &Config,
    storage: SqliteStorage,
    config_hash: &str,
) -> anyhow::Result<()> {
    let storage = Arc::new(storage);
    let run_id = storage
        .create_run(config_hash)
        .context("Failed to record crawl run")?;

    let crawler = Crawler::new(config, storage.clone()).context("Failed to build crawler")?;
    let report = crawler
        .start(&config.crawler.seed_url, config.crawler.workers)
        .await;

    if let Err(e) = storage.complete_run(run_id, &report.stats()) {
        tracing::error!("Failed to record completion of run {}: {}", run_id, e);
    }

    print_report(&report);
    Ok(())
}

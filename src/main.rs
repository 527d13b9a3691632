//! Newsreel main entry point
//!
//! Command-line interface for the Newsreel article crawler.

use clap::Parser;
use newsreel::config::{load_config_with_hash, Config};
use newsreel::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Newsreel: a resumable single-site article crawler
///
/// Newsreel crawls one website breadth-first from its configured base URL,
/// extracts article title, publish date, and body text from pages carrying
/// the configured content container, and stores everything in SQLite. An
/// interrupted crawl resumes where it left off.
#[derive(Parser, Debug)]
#[command(name = "newsreel")]
#[command(version)]
#[command(about = "A resumable single-site article crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start a fresh crawl, discarding previous URL state
    #[arg(long)]
    fresh: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        crawl(config, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("newsreel=info,warn"),
            1 => EnvFilter::new("newsreel=debug,info"),
            2 => EnvFilter::new("newsreel=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    newsreel::config::validate(config)?;

    println!("=== Newsreel Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);

    println!("\nCrawler:");
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Max retries: {}", config.crawler.max_retries);
    println!("  Backoff factor: {}ms", config.crawler.backoff_factor_ms);
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );

    println!("\nExtraction:");
    println!(
        "  Content selectors: {}",
        config.extraction.content_selectors.join(", ")
    );
    println!("  Heading selector: {}", config.extraction.heading_selector);
    println!("  Date selector: {}", config.extraction.date_selector);
    println!(
        "  Paragraph selector: {}",
        config.extraction.paragraph_selector
    );

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling from {}", config.site.base_url);

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use newsreel::output::{load_statistics, print_statistics};
    use newsreel::storage::SqliteStore;
    use std::path::Path;

    println!("Database: {}\n", config.output.database_path);

    let store = SqliteStore::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP client construction and page fetching
//! - Bounded exponential-backoff retry
//! - The bounded-concurrency fetch/extract/persist pipeline
//! - Overall crawl orchestration and resumption

mod fetcher;
mod pipeline;
mod retry;

pub use fetcher::{build_http_client, fetch_page};
pub use pipeline::{Pipeline, PipelineReport};
pub use retry::RetryPolicy;

use crate::config::Config;
use crate::extract::Extractor;
use crate::frontier::Frontier;
use crate::output::{load_statistics, log_crawl_summary};
use crate::storage::{SqliteStore, UrlStore};
use crate::Result;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open (or create) the database and reset interrupted work, or clear
///    all URL state when `fresh` is set
/// 2. Seed the frontier with the configured base URL
/// 3. Build the HTTP client, extractor, and retry policy
/// 4. Run the pipeline until the frontier is exhausted
/// 5. Log the final summary, including every permanently failed URL
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `fresh` - Whether to discard previous crawl state before starting
///
/// # Returns
///
/// * `Ok(())` - Crawl ran to exhaustion
/// * `Err(CrawlError)` - The shared store or configuration failed; per-URL
///   failures never surface here
pub async fn crawl(config: Config, fresh: bool) -> Result<()> {
    crate::config::validate(&config)?;

    let base_url = Url::parse(&config.site.base_url)?;

    let store = Arc::new(Mutex::new(SqliteStore::new(Path::new(
        &config.output.database_path,
    ))?));
    let frontier = Frontier::new(Arc::clone(&store), config.crawler.max_retries);

    if fresh {
        let cleared = {
            let mut store = store.lock().unwrap();
            store.clear_urls()
        };
        cleared?;
        tracing::info!("starting fresh: cleared previous URL state");
    } else {
        let recovered = frontier.recover_interrupted()?;
        if recovered > 0 {
            tracing::info!("resuming: reset {} interrupted URLs to pending", recovered);
        }
    }

    frontier.seed(base_url.as_str())?;

    let extractor = Extractor::new(&config.extraction, base_url)?;
    let client = build_http_client(&config.crawler, &config.user_agent)?;
    let retry = RetryPolicy::new(
        config.crawler.max_retries,
        Duration::from_millis(config.crawler.backoff_factor_ms),
    );

    let pipeline = Pipeline::new(
        frontier,
        Arc::clone(&store),
        client,
        extractor,
        retry,
        config.crawler.max_concurrent_fetches,
    );

    let report = pipeline.run().await?;
    tracing::info!(
        "crawl finished: {} units processed, {} succeeded, {} failed attempts",
        report.processed,
        report.succeeded,
        report.failed
    );

    let stats = {
        let store = store.lock().unwrap();
        load_statistics(&*store)?
    };
    log_crawl_summary(&stats);

    Ok(())
}

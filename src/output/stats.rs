//! Crawl statistics and the end-of-crawl summary
//!
//! Statistics are always loaded from the database, so the `--stats` mode
//! and the end-of-crawl summary report the same numbers.

use crate::storage::{ArticleSink, StorageResult, UrlStore};

/// Snapshot of crawl progress loaded from the store
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    pub total_urls: u64,
    pub pending: u64,
    pub in_flight: u64,
    pub done: u64,
    pub failed: u64,
    pub articles: u64,

    /// Permanently failed URLs with their recorded error messages
    pub failed_urls: Vec<(String, String)>,
}

/// Loads statistics from a store
pub fn load_statistics<S>(store: &S) -> StorageResult<CrawlStatistics>
where
    S: UrlStore + ArticleSink,
{
    Ok(CrawlStatistics {
        total_urls: store.count_urls()?,
        pending: store.count_pending()?,
        in_flight: store.count_in_flight()?,
        done: store.count_done()?,
        failed: store.count_failed()?,
        articles: store.count_articles()?,
        failed_urls: store.failed_urls()?,
    })
}

/// Prints statistics to stdout (for the `--stats` mode)
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");
    println!("URLs discovered:  {}", stats.total_urls);
    println!("  pending:        {}", stats.pending);
    println!("  in flight:      {}", stats.in_flight);
    println!("  done:           {}", stats.done);
    println!("  failed:         {}", stats.failed);
    println!("Articles stored:  {}", stats.articles);

    if !stats.failed_urls.is_empty() {
        println!("\nFailed URLs:");
        for (url, error) in &stats.failed_urls {
            println!("  {} ({})", url, error);
        }
    }
}

/// Logs the combined end-of-crawl summary
///
/// Every permanently failed URL is listed once here, so a crawl's failures
/// are visible in one place without scanning the whole log.
pub fn log_crawl_summary(stats: &CrawlStatistics) {
    tracing::info!(
        "summary: {} URLs ({} done, {} failed), {} articles stored",
        stats.total_urls,
        stats.done,
        stats.failed,
        stats.articles
    );

    if !stats.failed_urls.is_empty() {
        tracing::warn!("{} URLs permanently failed:", stats.failed_urls.len());
        for (url, error) in &stats.failed_urls {
            tracing::warn!("  {}: {}", url, error);
        }
    }
}

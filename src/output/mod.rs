//! Output module for crawl statistics and summaries

pub mod stats;

pub use stats::{load_statistics, log_crawl_summary, print_statistics, CrawlStatistics};

//! Newsreel: a resumable single-site article crawler
//!
//! This crate crawls one website breadth-first from a seed URL, extracts
//! structured article data (title, publish date, body text) from pages that
//! carry a matching content container, and follows same-site links until no
//! unvisited URLs remain. Crawl state is persisted in SQLite so an
//! interrupted crawl resumes without re-fetching completed pages.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod frontier;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Newsreel operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector in config: {0}")]
    InvalidSelector(String),
}

/// Result type alias for Newsreel operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::crawl;
pub use extract::{ExtractionResult, Extractor};
pub use frontier::Frontier;
pub use state::UrlState;
pub use storage::{Article, SqliteStore};

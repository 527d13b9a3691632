//! Storage traits and error types
//!
//! This module defines the trait interfaces for the two durable stores the
//! crawler depends on: the URL store backing the frontier, and the article
//! sink receiving extracted records.

use crate::storage::{Article, UrlRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("URL not found: {0}")]
    UrlNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable store for URL records and their crawl state
///
/// Backs every frontier operation. Implementations must make each method a
/// single atomic unit with respect to other callers; the frontier
/// additionally serializes calls behind a lock.
pub trait UrlStore {
    /// Inserts each URL as pending iff it is not already present in any
    /// state. Returns the number of records actually inserted.
    fn insert_new_urls(&mut self, urls: &[String]) -> StorageResult<usize>;

    /// Atomically selects up to `n` pending URLs in insertion order and
    /// marks them in-flight. Never returns a URL that is already in-flight
    /// or terminal.
    fn claim_batch(&mut self, n: usize) -> StorageResult<Vec<String>>;

    /// Transitions an in-flight URL to done
    fn mark_done(&mut self, url: &str) -> StorageResult<()>;

    /// Returns an in-flight URL to pending and increments its retry count
    fn release(&mut self, url: &str) -> StorageResult<()>;

    /// Transitions a URL to the terminal failed state, recording the error
    fn mark_failed(&mut self, url: &str, error: &str) -> StorageResult<()>;

    /// Gets the persisted retry count for a URL
    fn retry_count(&self, url: &str) -> StorageResult<u32>;

    /// Resets every in-flight record to pending (crash recovery).
    /// Returns the number of records reset.
    fn reset_interrupted(&mut self) -> StorageResult<usize>;

    /// Gets a single URL record, if present
    fn get_url(&self, url: &str) -> StorageResult<Option<UrlRecord>>;

    /// Counts records that are neither done nor failed nor in-flight
    fn count_pending(&self) -> StorageResult<u64>;

    /// Counts records currently claimed by a worker
    fn count_in_flight(&self) -> StorageResult<u64>;

    /// Counts successfully completed records
    fn count_done(&self) -> StorageResult<u64>;

    /// Counts permanently failed records
    fn count_failed(&self) -> StorageResult<u64>;

    /// Counts all known URL records
    fn count_urls(&self) -> StorageResult<u64>;

    /// Lists permanently failed URLs with their recorded error messages
    fn failed_urls(&self) -> StorageResult<Vec<(String, String)>>;

    /// Deletes all URL records (fresh crawl)
    fn clear_urls(&mut self) -> StorageResult<()>;
}

/// Durable, append-only sink for extracted articles
///
/// Records are unique by URL; inserting a duplicate is a no-op, never an
/// error, so a crash-recovery re-run of a batch cannot corrupt the store.
pub trait ArticleSink {
    /// Inserts an article iff no record with its URL exists.
    /// Returns true if the record was inserted, false if it was a no-op.
    fn insert_article(&mut self, article: &Article) -> StorageResult<bool>;

    /// Gets an article by URL, if present
    fn get_article(&self, url: &str) -> StorageResult<Option<Article>>;

    /// Counts stored articles
    fn count_articles(&self) -> StorageResult<u64>;
}

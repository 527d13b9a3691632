//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - URL state persistence backing the frontier
//! - Append-only article storage
//! - Crash-recovery support (resetting interrupted work on restart)

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStore;
pub use traits::{ArticleSink, StorageError, StorageResult, UrlStore};

use crate::state::UrlState;

/// Represents a discovered URL in the database
#[derive(Debug, Clone)]
pub struct UrlRecord {
    pub url: String,
    pub state: UrlState,
    pub retry_count: u32,
    pub error_message: Option<String>,
    pub discovered_at: String,
}

/// An extracted article, persisted append-only and keyed by URL
///
/// All fields may legitimately be empty except `url`: a page without a
/// matching content container still produces a record with empty title,
/// date, and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub date_published: String,
    pub content: String,
}

//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Newsreel database.

/// SQL schema for the database
///
/// The `urls` table is the persisted frontier: `visited` means claimed at
/// least once, `scraped` means fully processed. Pending rows have neither
/// flag set, in-flight rows only `visited`, terminal rows both; a non-NULL
/// `error_message` marks a terminal row as failed rather than done. Claim
/// order is rowid order, which is insertion order.
pub const SCHEMA_SQL: &str = r#"
-- Every discovered URL and its crawl state
CREATE TABLE IF NOT EXISTS urls (
    url TEXT PRIMARY KEY,
    visited INTEGER NOT NULL DEFAULT 0,
    scraped INTEGER NOT NULL DEFAULT 0,
    retry_count INTEGER NOT NULL DEFAULT 0,
    error_message TEXT,
    discovered_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_urls_visited ON urls(visited);
CREATE INDEX IF NOT EXISTS idx_urls_scraped ON urls(scraped);

-- Extracted articles, append-only, one per successfully processed URL
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    date_published TEXT NOT NULL,
    content TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

//! SQLite storage implementation
//!
//! This module provides the SQLite-based implementation of the `UrlStore`
//! and `ArticleSink` traits. Both live in one database file; the traits
//! keep the two concerns independent at the interface.

use crate::state::UrlState;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ArticleSink, StorageResult, UrlStore};
use crate::storage::{Article, UrlRecord};
use crate::CrawlError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a new SqliteStore instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(CrawlError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, CrawlError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, CrawlError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<UrlRecord> {
        let url: String = row.get(0)?;
        let visited: bool = row.get(1)?;
        let scraped: bool = row.get(2)?;
        let retry_count: u32 = row.get(3)?;
        let error_message: Option<String> = row.get(4)?;
        let discovered_at: String = row.get(5)?;

        Ok(UrlRecord {
            url,
            state: UrlState::from_flags(visited, scraped, error_message.is_some()),
            retry_count,
            error_message,
            discovered_at,
        })
    }
}

impl UrlStore for SqliteStore {
    fn insert_new_urls(&mut self, urls: &[String]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO urls (url, visited, scraped, discovered_at)
                 VALUES (?1, 0, 0, ?2)",
            )?;
            for url in urls {
                inserted += stmt.execute(params![url, now])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn claim_batch(&mut self, n: usize) -> StorageResult<Vec<String>> {
        let tx = self.conn.transaction()?;
        let claimed = {
            let mut stmt = tx.prepare(
                "SELECT url FROM urls WHERE visited = 0 ORDER BY rowid ASC LIMIT ?1",
            )?;
            let urls = stmt
                .query_map(params![n as i64], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;

            let mut update = tx.prepare("UPDATE urls SET visited = 1 WHERE url = ?1")?;
            for url in &urls {
                update.execute(params![url])?;
            }
            urls
        };
        tx.commit()?;
        Ok(claimed)
    }

    fn mark_done(&mut self, url: &str) -> StorageResult<()> {
        self.conn.execute(
            "UPDATE urls SET scraped = 1, error_message = NULL WHERE url = ?1",
            params![url],
        )?;
        Ok(())
    }

    fn release(&mut self, url: &str) -> StorageResult<()> {
        self.conn.execute(
            "UPDATE urls SET visited = 0, retry_count = retry_count + 1
             WHERE url = ?1 AND visited = 1 AND scraped = 0",
            params![url],
        )?;
        Ok(())
    }

    fn mark_failed(&mut self, url: &str, error: &str) -> StorageResult<()> {
        self.conn.execute(
            "UPDATE urls SET visited = 1, scraped = 1, error_message = ?2 WHERE url = ?1",
            params![url, error],
        )?;
        Ok(())
    }

    fn retry_count(&self, url: &str) -> StorageResult<u32> {
        let count: Option<u32> = self
            .conn
            .query_row(
                "SELECT retry_count FROM urls WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.unwrap_or(0))
    }

    fn reset_interrupted(&mut self) -> StorageResult<usize> {
        let reset = self.conn.execute(
            "UPDATE urls SET visited = 0 WHERE visited = 1 AND scraped = 0",
            [],
        )?;
        Ok(reset)
    }

    fn get_url(&self, url: &str) -> StorageResult<Option<UrlRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT url, visited, scraped, retry_count, error_message, discovered_at
                 FROM urls WHERE url = ?1",
                params![url],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn count_pending(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM urls WHERE visited = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_in_flight(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM urls WHERE visited = 1 AND scraped = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_done(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM urls WHERE scraped = 1 AND error_message IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_failed(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM urls WHERE scraped = 1 AND error_message IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_urls(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM urls", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn failed_urls(&self) -> StorageResult<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT url, error_message FROM urls
             WHERE scraped = 1 AND error_message IS NOT NULL
             ORDER BY rowid ASC",
        )?;

        let failed = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(failed)
    }

    fn clear_urls(&mut self) -> StorageResult<()> {
        self.conn.execute("DELETE FROM urls", [])?;
        Ok(())
    }
}

impl ArticleSink for SqliteStore {
    fn insert_article(&mut self, article: &Article) -> StorageResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO articles (url, title, date_published, content)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                article.url,
                article.title,
                article.date_published,
                article.content
            ],
        )?;
        Ok(inserted > 0)
    }

    fn get_article(&self, url: &str) -> StorageResult<Option<Article>> {
        let article = self
            .conn
            .query_row(
                "SELECT url, title, date_published, content FROM articles WHERE url = ?1",
                params![url],
                |row| {
                    Ok(Article {
                        url: row.get(0)?,
                        title: row.get(1)?,
                        date_published: row.get(2)?,
                        content: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(article)
    }

    fn count_articles(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

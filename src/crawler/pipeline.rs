//! Fetch-process pipeline - the bounded-concurrency crawl engine
//!
//! The pipeline drives the crawl to completion:
//!
//! 1. Claim a batch of up to K URLs from the frontier
//! 2. Run fetch + extract for each claimed URL concurrently, each as one
//!    retried unit under the retry policy
//! 3. On success: persist the article, enqueue discovered links, mark the
//!    URL complete. On exhausted retries: hand the URL back to the
//!    frontier's failure handling and continue
//! 4. Repeat until the frontier is exhausted
//!
//! The whole batch is drained before exhaustion is re-evaluated, so the
//! frontier never looks empty while units are still settling. A single
//! URL's permanent failure never aborts the crawl; only a store failure on
//! a frontier operation itself propagates out.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::retry::RetryPolicy;
use crate::extract::{ExtractionResult, Extractor};
use crate::frontier::Frontier;
use crate::storage::{Article, ArticleSink, SqliteStore};
use crate::Result;
use reqwest::Client;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use url::Url;

/// How long to wait before re-checking a frontier that returned an empty
/// batch without being exhausted
const SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Counters accumulated over one pipeline run
#[derive(Debug, Default, Clone, Copy)]
pub struct PipelineReport {
    /// Crawl units whose outcome was dispatched
    pub processed: u64,

    /// Units that fetched, extracted, and persisted successfully
    pub succeeded: u64,

    /// Units that failed after their in-flight retries were exhausted
    /// (the URL may still have been re-queued by the frontier)
    pub failed: u64,
}

/// The bounded-concurrency fetch/extract/persist engine
pub struct Pipeline {
    frontier: Frontier,
    sink: Arc<Mutex<SqliteStore>>,
    client: Client,
    extractor: Arc<Extractor>,
    retry: RetryPolicy,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(
        frontier: Frontier,
        sink: Arc<Mutex<SqliteStore>>,
        client: Client,
        extractor: Extractor,
        retry: RetryPolicy,
        concurrency: usize,
    ) -> Self {
        Self {
            frontier,
            sink,
            client,
            extractor: Arc::new(extractor),
            retry,
            concurrency,
        }
    }

    /// Runs the crawl until the frontier is exhausted
    pub async fn run(&self) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();
        let start = Instant::now();

        loop {
            let batch = self.frontier.claim_batch(self.concurrency)?;

            if batch.is_empty() {
                if self.frontier.is_exhausted()? {
                    break;
                }
                // In-flight work elsewhere is still settling
                tokio::time::sleep(SETTLE_DELAY).await;
                continue;
            }

            tracing::debug!("claimed batch of {}", batch.len());

            let mut units = JoinSet::new();
            for url in batch {
                let client = self.client.clone();
                let extractor = Arc::clone(&self.extractor);
                let retry = self.retry;
                units.spawn(async move {
                    let outcome = retry
                        .run(|| fetch_and_extract(&client, &extractor, &url))
                        .await;
                    (url, outcome)
                });
            }

            while let Some(joined) = units.join_next().await {
                match joined {
                    Ok((url, Ok(result))) => {
                        self.handle_success(&url, result)?;
                        report.succeeded += 1;
                    }
                    Ok((url, Err(err))) => {
                        report.failed += 1;
                        let parked = self.frontier.fail(&url, &err.to_string())?;
                        if parked {
                            tracing::warn!("giving up on {}: {}", url, err);
                        } else {
                            tracing::debug!("re-queued {} after: {}", url, err);
                        }
                    }
                    Err(join_err) => {
                        tracing::error!("crawl unit panicked: {}", join_err);
                    }
                }

                report.processed += 1;
                if report.processed % 25 == 0 {
                    let rate = report.processed as f64 / start.elapsed().as_secs_f64();
                    tracing::info!(
                        "progress: {} units processed, {} pending, {:.2} pages/sec",
                        report.processed,
                        self.frontier.pending_count()?,
                        rate
                    );
                }
            }
        }

        Ok(report)
    }

    /// Dispatches a successful unit: persist, enqueue discoveries, complete
    fn handle_success(&self, url: &str, result: ExtractionResult) -> Result<()> {
        let article = Article {
            url: url.to_string(),
            title: result.title,
            date_published: result.date_published,
            content: result.content,
        };

        // Lock scope must end before any frontier call: the frontier shares
        // this store's mutex.
        let inserted = {
            let mut sink = self.sink.lock().unwrap();
            sink.insert_article(&article)
        };

        match inserted {
            Ok(fresh) => {
                if !fresh {
                    tracing::debug!("article for {} already stored", url);
                }
                self.frontier.enqueue(&result.links)?;
                self.frontier.complete(url)?;
            }
            Err(err) => {
                // Terminal for this URL only; re-fetching cannot help
                tracing::error!("failed to persist article for {}: {}", url, err);
                self.frontier.fail_permanent(url, &err.to_string())?;
            }
        }

        Ok(())
    }
}

/// One retried crawl unit: fetch the page, then extract synchronously
async fn fetch_and_extract(
    client: &Client,
    extractor: &Extractor,
    url: &str,
) -> Result<ExtractionResult> {
    let body = fetch_page(client, url).await?;
    let page_url = Url::parse(url)?;
    Ok(extractor.extract(&page_url, &body))
}

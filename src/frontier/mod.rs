//! The URL frontier - the authoritative set of known URLs and their state
//!
//! The frontier is the single source of truth for "what is left to do".
//! Workers never maintain their own visited-set: every membership check,
//! claim, and state transition routes through the operations here, each of
//! which holds the store lock for its whole transition. That makes claims
//! and enqueues linearizable - two workers racing to claim, or two
//! discovery events racing to enqueue the same URL, can never produce
//! duplicate in-flight work.
//!
//! State transitions are monotonic per URL: `Pending -> InFlight -> Done`.
//! A failed unit returns to `Pending` until the retry budget is spent,
//! then parks in the terminal `Failed` state.

use crate::storage::{SqliteStore, UrlStore};
use crate::Result;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use url::Url;

/// The crawl frontier, backed by the persistent URL store
///
/// Cloning is cheap; clones share the same underlying store and lock.
#[derive(Clone)]
pub struct Frontier {
    store: Arc<Mutex<SqliteStore>>,
    retry_budget: u32,
}

impl Frontier {
    /// Creates a frontier over a shared store
    ///
    /// # Arguments
    ///
    /// * `store` - The shared SQLite store persisting URL state
    /// * `retry_budget` - How many times a URL may return to pending after
    ///   a failed processing attempt before it is parked as failed
    pub fn new(store: Arc<Mutex<SqliteStore>>, retry_budget: u32) -> Self {
        Self {
            store,
            retry_budget,
        }
    }

    /// Seeds the frontier with the crawl's starting URL
    ///
    /// The URL is stored in canonical absolute form. Seeding an already
    /// known URL is a no-op, so resuming a crawl never duplicates the seed.
    pub fn seed(&self, url: &str) -> Result<()> {
        let canonical = Url::parse(url)?.to_string();
        let mut store = self.store.lock().unwrap();
        store.insert_new_urls(&[canonical])?;
        Ok(())
    }

    /// Inserts each URL as pending iff it is not already known in any state
    ///
    /// Returns the number of URLs actually inserted. Idempotent: duplicate
    /// URLs within the set or already present in the store are ignored.
    pub fn enqueue(&self, urls: &BTreeSet<String>) -> Result<usize> {
        if urls.is_empty() {
            return Ok(0);
        }
        let batch: Vec<String> = urls.iter().cloned().collect();
        let mut store = self.store.lock().unwrap();
        Ok(store.insert_new_urls(&batch)?)
    }

    /// Atomically claims up to `n` pending URLs, transitioning them to
    /// in-flight
    ///
    /// URLs are served in insertion order, preserving breadth-first
    /// traversal. A URL already in-flight or terminal is never returned.
    pub fn claim_batch(&self, n: usize) -> Result<Vec<String>> {
        let mut store = self.store.lock().unwrap();
        Ok(store.claim_batch(n)?)
    }

    /// Transitions an in-flight URL to done
    pub fn complete(&self, url: &str) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        store.mark_done(url)?;
        Ok(())
    }

    /// Records a failed processing attempt for an in-flight URL
    ///
    /// Under the retry budget the URL returns to pending and will be
    /// claimed again; at the budget it is parked in the terminal failed
    /// state with the error recorded. Returns true if the URL was parked.
    pub fn fail(&self, url: &str, error: &str) -> Result<bool> {
        let mut store = self.store.lock().unwrap();
        if store.retry_count(url)? < self.retry_budget {
            store.release(url)?;
            Ok(false)
        } else {
            store.mark_failed(url, error)?;
            Ok(true)
        }
    }

    /// Parks a URL as failed immediately, bypassing the retry budget
    ///
    /// Used for non-transient per-URL errors (e.g. a persistence failure
    /// for that URL's article) where re-fetching cannot help.
    pub fn fail_permanent(&self, url: &str, error: &str) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        store.mark_failed(url, error)?;
        Ok(())
    }

    /// Returns true iff no pending and no in-flight URLs remain
    pub fn is_exhausted(&self) -> Result<bool> {
        let store = self.store.lock().unwrap();
        Ok(store.count_pending()? == 0 && store.count_in_flight()? == 0)
    }

    /// Resets every in-flight URL back to pending
    ///
    /// Called once at startup: any record left in-flight by a previous
    /// process is assumed interrupted and must be processed again.
    /// Returns the number of URLs reset.
    pub fn recover_interrupted(&self) -> Result<usize> {
        let mut store = self.store.lock().unwrap();
        Ok(store.reset_interrupted()?)
    }

    /// Number of URLs waiting to be claimed
    pub fn pending_count(&self) -> Result<u64> {
        let store = self.store.lock().unwrap();
        Ok(store.count_pending()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UrlState;
    use std::thread;

    fn test_frontier(retry_budget: u32) -> Frontier {
        let store = Arc::new(Mutex::new(SqliteStore::new_in_memory().unwrap()));
        Frontier::new(store, retry_budget)
    }

    fn url_set(raw: &[&str]) -> BTreeSet<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn state_of(frontier: &Frontier, url: &str) -> UrlState {
        let store = frontier.store.lock().unwrap();
        store.get_url(url).unwrap().unwrap().state
    }

    #[test]
    fn test_seed_canonicalizes() {
        let frontier = test_frontier(3);
        frontier.seed("https://example.test").unwrap();

        // The parsed absolute form carries the trailing slash
        assert_eq!(
            state_of(&frontier, "https://example.test/"),
            UrlState::Pending
        );
    }

    #[test]
    fn test_seed_twice_is_noop() {
        let frontier = test_frontier(3);
        frontier.seed("https://example.test/").unwrap();
        frontier.seed("https://example.test/").unwrap();

        assert_eq!(frontier.pending_count().unwrap(), 1);
    }

    #[test]
    fn test_enqueue_deduplicates() {
        let frontier = test_frontier(3);

        let first = frontier
            .enqueue(&url_set(&["https://e.test/a", "https://e.test/b"]))
            .unwrap();
        let second = frontier
            .enqueue(&url_set(&["https://e.test/b", "https://e.test/c"]))
            .unwrap();

        assert_eq!(first, 2);
        assert_eq!(second, 1);
        assert_eq!(frontier.pending_count().unwrap(), 3);
    }

    #[test]
    fn test_concurrent_enqueue_one_record_per_url() {
        let frontier = test_frontier(3);
        let urls = url_set(&[
            "https://e.test/a",
            "https://e.test/b",
            "https://e.test/c",
            "https://e.test/d",
        ]);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let frontier = frontier.clone();
                let urls = urls.clone();
                thread::spawn(move || frontier.enqueue(&urls).unwrap())
            })
            .collect();

        let total_inserted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(total_inserted, 4);
        assert_eq!(frontier.pending_count().unwrap(), 4);
    }

    #[test]
    fn test_claim_batch_fifo() {
        let frontier = test_frontier(3);
        frontier.enqueue(&url_set(&["https://e.test/1"])).unwrap();
        frontier.enqueue(&url_set(&["https://e.test/2"])).unwrap();
        frontier.enqueue(&url_set(&["https://e.test/3"])).unwrap();

        let batch = frontier.claim_batch(2).unwrap();
        assert_eq!(batch, vec!["https://e.test/1", "https://e.test/2"]);
    }

    #[test]
    fn test_concurrent_claims_never_double_claim() {
        let frontier = test_frontier(3);
        let urls: BTreeSet<String> = (0..20).map(|i| format!("https://e.test/{i}")).collect();
        frontier.enqueue(&urls).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let frontier = frontier.clone();
                thread::spawn(move || frontier.claim_batch(10).unwrap())
            })
            .collect();

        let mut claimed: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        let total = claimed.len();
        claimed.sort();
        claimed.dedup();

        // Every URL claimed exactly once across all racing claimers
        assert_eq!(total, 20);
        assert_eq!(claimed.len(), 20);
    }

    #[test]
    fn test_complete_transitions_to_done() {
        let frontier = test_frontier(3);
        frontier.enqueue(&url_set(&["https://e.test/a"])).unwrap();
        frontier.claim_batch(1).unwrap();
        frontier.complete("https://e.test/a").unwrap();

        assert_eq!(state_of(&frontier, "https://e.test/a"), UrlState::Done);
        assert!(frontier.is_exhausted().unwrap());
    }

    #[test]
    fn test_fail_repends_until_budget_spent() {
        let frontier = test_frontier(2);
        frontier.enqueue(&url_set(&["https://e.test/a"])).unwrap();

        for round in 0..2 {
            let batch = frontier.claim_batch(1).unwrap();
            assert_eq!(batch.len(), 1, "round {round} should reclaim the URL");
            let parked = frontier.fail("https://e.test/a", "HTTP status 500").unwrap();
            assert!(!parked);
            assert_eq!(state_of(&frontier, "https://e.test/a"), UrlState::Pending);
        }

        // Third failure exhausts the budget of 2
        frontier.claim_batch(1).unwrap();
        let parked = frontier.fail("https://e.test/a", "HTTP status 500").unwrap();
        assert!(parked);
        assert_eq!(state_of(&frontier, "https://e.test/a"), UrlState::Failed);
        assert!(frontier.is_exhausted().unwrap());
    }

    #[test]
    fn test_fail_with_zero_budget_parks_immediately() {
        let frontier = test_frontier(0);
        frontier.enqueue(&url_set(&["https://e.test/a"])).unwrap();
        frontier.claim_batch(1).unwrap();

        let parked = frontier.fail("https://e.test/a", "connection refused").unwrap();
        assert!(parked);
        assert_eq!(state_of(&frontier, "https://e.test/a"), UrlState::Failed);
    }

    #[test]
    fn test_fail_permanent_bypasses_budget() {
        let frontier = test_frontier(5);
        frontier.enqueue(&url_set(&["https://e.test/a"])).unwrap();
        frontier.claim_batch(1).unwrap();

        frontier
            .fail_permanent("https://e.test/a", "article insert failed")
            .unwrap();
        assert_eq!(state_of(&frontier, "https://e.test/a"), UrlState::Failed);
    }

    #[test]
    fn test_is_exhausted_with_in_flight_work() {
        let frontier = test_frontier(3);
        frontier.enqueue(&url_set(&["https://e.test/a"])).unwrap();
        assert!(!frontier.is_exhausted().unwrap());

        frontier.claim_batch(1).unwrap();
        // Claimed but not completed: still not exhausted
        assert!(!frontier.is_exhausted().unwrap());

        frontier.complete("https://e.test/a").unwrap();
        assert!(frontier.is_exhausted().unwrap());
    }

    #[test]
    fn test_empty_frontier_is_exhausted() {
        let frontier = test_frontier(3);
        assert!(frontier.is_exhausted().unwrap());
    }

    #[test]
    fn test_recover_interrupted() {
        let frontier = test_frontier(3);
        frontier
            .enqueue(&url_set(&["https://e.test/a", "https://e.test/b"]))
            .unwrap();
        frontier.claim_batch(1).unwrap();

        // Simulated restart: the in-flight claim was never completed
        let reset = frontier.recover_interrupted().unwrap();
        assert_eq!(reset, 1);
        assert_eq!(frontier.pending_count().unwrap(), 2);

        // The recovered URL is claimable again, still in FIFO position
        let batch = frontier.claim_batch(2).unwrap();
        assert_eq!(batch, vec!["https://e.test/a", "https://e.test/b"]);
    }
}

//! Bounded exponential-backoff retry
//!
//! The policy wraps any fallible asynchronous operation: attempt up to
//! `max_retries + 1` times total, sleep `backoff_factor * 2^attempt`
//! between attempts, and propagate the final error. Sleeping goes through
//! the runtime, so a backing-off unit never blocks concurrent work.

use std::future::Future;
use std::time::Duration;

/// A reusable retry policy with bounded exponential backoff
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_factor: Duration,
}

impl RetryPolicy {
    /// Creates a policy allowing `max_retries` retries beyond the first
    /// attempt, with `backoff_factor` as the base delay
    pub fn new(max_retries: u32, backoff_factor: Duration) -> Self {
        Self {
            max_retries,
            backoff_factor,
        }
    }

    /// Delay before the retry following attempt `attempt` (0-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff_factor * 2u32.saturating_pow(attempt.min(20))
    }

    /// Runs an operation under this policy
    ///
    /// The operation is invoked up to `max_retries + 1` times. The error of
    /// the final attempt is returned as-is; intermediate errors are
    /// discarded after the backoff sleep.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(self.delay(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}

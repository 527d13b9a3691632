/// URL state definitions for tracking crawl progress
///
/// This module defines every state a discovered URL moves through during a
/// crawl. Transitions are monotonic: `Pending -> InFlight -> Done`, with a
/// failed fetch returning a URL to `Pending` until its retry budget is
/// spent, after which it parks in the terminal `Failed` state.
use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlState {
    /// URL is known but not yet claimed by a worker
    Pending,

    /// URL has been claimed by a worker and is being processed
    InFlight,

    /// URL was fetched and its article persisted
    Done,

    /// URL permanently failed after its retry budget was exhausted
    Failed,
}

impl UrlState {
    /// Returns true if this is a terminal state (no further processing)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if this URL may still be processed
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this represents a permanent failure
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Decodes a state from the persisted flag pair
    ///
    /// The `urls` table stores two booleans per record: `visited` (claimed
    /// at least once) and `scraped` (fully processed). `Done` and `Failed`
    /// share the both-set encoding; a recorded error message tells them
    /// apart.
    pub fn from_flags(visited: bool, scraped: bool, has_error: bool) -> Self {
        match (visited, scraped) {
            (false, _) => Self::Pending,
            (true, false) => Self::InFlight,
            (true, true) if has_error => Self::Failed,
            (true, true) => Self::Done,
        }
    }

    /// Encodes this state as the persisted `(visited, scraped)` flag pair
    pub fn flags(&self) -> (bool, bool) {
        match self {
            Self::Pending => (false, false),
            Self::InFlight => (true, false),
            Self::Done | Self::Failed => (true, true),
        }
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::InFlight => "in_flight",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

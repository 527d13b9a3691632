//! State module for tracking crawl progress
//!
//! Defines the `UrlState` lifecycle every discovered URL moves through and
//! its mapping onto the persisted `visited`/`scraped` flag pair.

mod url_state;

pub use url_state::UrlState;

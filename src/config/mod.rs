//! Configuration module for Newsreel
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every section defaults, so the crawler also runs without a file.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractionConfig, OutputConfig, SiteConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;

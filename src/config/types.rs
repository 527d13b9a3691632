use serde::Deserialize;

/// Main configuration structure for Newsreel
///
/// Every section has sane defaults, so the crawler runs with no
/// configuration file at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            crawler: CrawlerConfig::default(),
            extraction: ExtractionConfig::default(),
            output: OutputConfig::default(),
            user_agent: UserAgentConfig::default(),
        }
    }
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL of the site to crawl; also the seed URL. Discovered links
    /// are kept only if their absolute form starts with this string.
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.eenadu.net".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of simultaneously in-flight fetches; also the size
    /// of each batch claimed from the frontier
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,

    /// Retries per fetch+extract unit beyond the first attempt; also the
    /// per-URL re-queue budget before the frontier parks a URL as failed
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds; attempt `i` sleeps
    /// `backoff-factor-ms * 2^i` before the next attempt
    #[serde(rename = "backoff-factor-ms")]
    pub backoff_factor_ms: u64,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 10,
            max_retries: 3,
            backoff_factor_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

/// CSS selectors driving article extraction
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Content container candidates, tried in order; the first match wins
    #[serde(rename = "content-selectors")]
    pub content_selectors: Vec<String>,

    /// Heading element within the container; the first match is the title
    #[serde(rename = "heading-selector")]
    pub heading_selector: String,

    /// Publish-date element within the container
    #[serde(rename = "date-selector")]
    pub date_selector: String,

    /// Paragraph elements within the container, concatenated into the body
    #[serde(rename = "paragraph-selector")]
    pub paragraph_selector: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            content_selectors: vec![
                "div.fullstory".to_string(),
                "section.fullstory".to_string(),
            ],
            heading_selector: "h1".to_string(),
            date_selector: "div.pub-t".to_string(),
            paragraph_selector: "p".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database holding URL state and articles
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./newsreel.db".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "newsreel".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

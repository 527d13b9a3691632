use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Used to detect whether the configuration changed between crawl runs.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let config_content = r#"
[site]
base-url = "https://news.example.com"

[crawler]
max-concurrent-fetches = 4
max-retries = 2
backoff-factor-ms = 250
request-timeout-secs = 10

[extraction]
content-selectors = ["div.story", "article.story"]
heading-selector = "h2"
date-selector = "span.published"
paragraph-selector = "p"

[output]
database-path = "./news.db"

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "9.9"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.base_url, "https://news.example.com");
        assert_eq!(config.crawler.max_concurrent_fetches, 4);
        assert_eq!(config.crawler.max_retries, 2);
        assert_eq!(config.crawler.backoff_factor_ms, 250);
        assert_eq!(
            config.extraction.content_selectors,
            vec!["div.story".to_string(), "article.story".to_string()]
        );
        assert_eq!(config.extraction.heading_selector, "h2");
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.base_url, "https://www.eenadu.net");
        assert_eq!(config.crawler.max_concurrent_fetches, 10);
        assert_eq!(config.crawler.max_retries, 3);
        assert_eq!(config.crawler.backoff_factor_ms, 1000);
        assert_eq!(
            config.extraction.content_selectors,
            vec!["div.fullstory".to_string(), "section.fullstory".to_string()]
        );
        assert_eq!(config.extraction.date_selector, "div.pub-t");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config_content = r#"
[crawler]
max-concurrent-fetches = 2
"#;
        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_concurrent_fetches, 2);
        assert_eq!(config.crawler.max_retries, 3);
        assert_eq!(config.output.database_path, "./newsreel.db");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
max-concurrent-fetches = 0
"#;
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}

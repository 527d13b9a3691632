use crate::config::types::Config;
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates a parsed configuration
///
/// Checks that:
/// - the base URL parses as an absolute http(s) URL
/// - the concurrency bound is at least 1
/// - at least one content selector candidate is configured
/// - every configured CSS selector parses
/// - the database path is non-empty
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let base = Url::parse(&config.site.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.site.base_url, e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must be http or https, got: {}",
            base.scheme()
        )));
    }

    if config.crawler.max_concurrent_fetches == 0 {
        return Err(ConfigError::Validation(
            "max-concurrent-fetches must be at least 1".to_string(),
        ));
    }

    if config.extraction.content_selectors.is_empty() {
        return Err(ConfigError::Validation(
            "at least one content selector is required".to_string(),
        ));
    }

    let mut selectors: Vec<&str> = config
        .extraction
        .content_selectors
        .iter()
        .map(String::as_str)
        .collect();
    selectors.push(&config.extraction.heading_selector);
    selectors.push(&config.extraction.date_selector);
    selectors.push(&config.extraction.paragraph_selector);

    for selector in selectors {
        if Selector::parse(selector).is_err() {
            return Err(ConfigError::InvalidSelector(selector.to_string()));
        }
    }

    if config.output.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let mut config = Config::default();
        config.site.base_url = "ftp://example.com".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = Config::default();
        config.crawler.max_concurrent_fetches = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_content_selectors_rejected() {
        let mut config = Config::default();
        config.extraction.content_selectors.clear();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_selector_rejected() {
        let mut config = Config::default();
        config.extraction.date_selector = "div..[".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let mut config = Config::default();
        config.output.database_path = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}

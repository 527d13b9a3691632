//! Compiled CSS selector set for article extraction
//!
//! Selector strings come from the `[extraction]` config section and are
//! compiled once at startup; a selector that fails to parse is a
//! configuration error, not a per-page failure.

use crate::config::ExtractionConfig;
use crate::ConfigError;
use scraper::Selector;

/// The compiled selectors driving one extractor instance
#[derive(Debug, Clone)]
pub struct SelectorSet {
    /// Content container candidates, tried in order; first match wins
    pub content: Vec<Selector>,

    /// Heading element within the container
    pub heading: Selector,

    /// Publish-date element within the container
    pub date: Selector,

    /// Paragraph elements within the container
    pub paragraph: Selector,

    /// Anchor elements scanned over the whole document
    pub anchor: Selector,
}

impl SelectorSet {
    /// Compiles the configured selector strings
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        let content = config
            .content_selectors
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            content,
            heading: parse_selector(&config.heading_selector)?,
            date: parse_selector(&config.date_selector)?,
            paragraph: parse_selector(&config.paragraph_selector)?,
            anchor: parse_selector("a[href]")?,
        })
    }
}

fn parse_selector(raw: &str) -> Result<Selector, ConfigError> {
    Selector::parse(raw).map_err(|_| ConfigError::InvalidSelector(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_compile() {
        let set = SelectorSet::from_config(&ExtractionConfig::default()).unwrap();
        assert_eq!(set.content.len(), 2);
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let mut config = ExtractionConfig::default();
        config.heading_selector = "h1..[".to_string();

        let result = SelectorSet::from_config(&config);
        assert!(matches!(result, Err(ConfigError::InvalidSelector(_))));
    }
}

//! Article and link extraction from fetched pages
//!
//! Extraction never fails a crawl unit: a page without a matching content
//! container yields a result with empty article fields, and link discovery
//! still runs over the whole document, because a container-less page may
//! be a navigation or index page worth crawling.
//!
//! # Extraction rules
//!
//! - The content container is the first match among the configured
//!   candidate selectors, tried in order.
//! - `title` is the text of the first heading element in the container.
//! - `date_published` is the trimmed text of the publish-date element.
//! - `content` concatenates the text of every paragraph element in the
//!   container, in document order, each followed by a blank line.
//! - Links are collected from every anchor in the whole document, resolved
//!   against the page URL, kept only when the absolute form starts with
//!   the site base URL, and deduplicated.

mod selectors;

pub use selectors::SelectorSet;

use crate::config::ExtractionConfig;
use crate::ConfigError;
use scraper::{ElementRef, Html};
use std::collections::BTreeSet;
use url::Url;

/// Everything extracted from one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Article title, empty if the page had no matching container
    pub title: String,

    /// Publish date as displayed on the page, empty if absent
    pub date_published: String,

    /// Article body, paragraphs separated by blank lines, empty if absent
    pub content: String,

    /// Discovered same-site links in canonical absolute form
    pub links: BTreeSet<String>,
}

/// Extracts article fields and same-site links from page bodies
pub struct Extractor {
    selectors: SelectorSet,
    base_url: Url,
}

impl Extractor {
    /// Creates an extractor for one site
    ///
    /// # Arguments
    ///
    /// * `config` - The selector configuration
    /// * `base_url` - The site base URL; discovered links are kept only if
    ///   their absolute form starts with this URL's string form
    pub fn new(config: &ExtractionConfig, base_url: Url) -> Result<Self, ConfigError> {
        Ok(Self {
            selectors: SelectorSet::from_config(config)?,
            base_url,
        })
    }

    /// Extracts article fields and links from a fetched page body
    ///
    /// # Arguments
    ///
    /// * `page_url` - The URL the body was fetched from; relative links
    ///   resolve against it
    /// * `body` - The raw HTML body
    pub fn extract(&self, page_url: &Url, body: &str) -> ExtractionResult {
        let document = Html::parse_document(body);

        let (title, date_published, content) = match self.find_container(&document) {
            Some(container) => (
                self.extract_title(container),
                self.extract_date(container),
                self.extract_content(container),
            ),
            None => (String::new(), String::new(), String::new()),
        };

        let links = self.extract_links(&document, page_url);

        ExtractionResult {
            title,
            date_published,
            content,
            links,
        }
    }

    /// Finds the content container by trying each candidate selector in order
    fn find_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.selectors
            .content
            .iter()
            .find_map(|selector| document.select(selector).next())
    }

    /// Title is the text of the first heading element in the container
    fn extract_title(&self, container: ElementRef<'_>) -> String {
        container
            .select(&self.selectors.heading)
            .next()
            .map(|heading| heading.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    /// Publish date is the trimmed text of the designated date element
    fn extract_date(&self, container: ElementRef<'_>) -> String {
        container
            .select(&self.selectors.date)
            .next()
            .map(|date| date.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    /// Body text concatenates every paragraph, each followed by a blank line
    fn extract_content(&self, container: ElementRef<'_>) -> String {
        let mut content = String::new();
        for paragraph in container.select(&self.selectors.paragraph) {
            content.push_str(&paragraph.text().collect::<String>());
            content.push_str("\n\n");
        }
        content
    }

    /// Scans every anchor in the whole document for same-site links
    fn extract_links(&self, document: &Html, page_url: &Url) -> BTreeSet<String> {
        let mut links = BTreeSet::new();

        for anchor in document.select(&self.selectors.anchor) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if let Some(resolved) = self.resolve_link(href, page_url) {
                links.insert(resolved);
            }
        }

        links
    }

    /// Resolves an href to an absolute same-site URL
    ///
    /// Returns None for non-navigational hrefs (javascript:, mailto:, tel:,
    /// data: and fragment-only links), unparseable hrefs, and any resolved
    /// URL that leaves the configured site.
    fn resolve_link(&self, href: &str, page_url: &Url) -> Option<String> {
        let href = href.trim();

        if href.is_empty() {
            return None;
        }

        if href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with("data:")
        {
            return None;
        }

        if href.starts_with('#') {
            return None;
        }

        let resolved = page_url.join(href).ok()?;

        if resolved.as_str().starts_with(self.base_url.as_str()) {
            Some(resolved.to_string())
        } else {
            None
        }
    }
}

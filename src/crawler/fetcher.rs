//! HTTP fetcher implementation
//!
//! This module owns the crawler's HTTP surface: building the shared client
//! and fetching single pages. A non-2xx status and a transport failure are
//! distinct error variants so callers can log them apart; both are
//! transient from the retry policy's point of view.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::CrawlError;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client shared by all crawl workers
///
/// # Arguments
///
/// * `crawler` - Crawler configuration (request timeout)
/// * `user_agent` - User agent identification
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    let ua = format!(
        "{}/{}",
        user_agent.crawler_name, user_agent.crawler_version
    );

    Client::builder()
        .user_agent(ua)
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body
///
/// # Returns
///
/// * `Ok(String)` - The response body for a 2xx response
/// * `Err(CrawlError::Status)` - Non-2xx response
/// * `Err(CrawlError::Http)` - Transport failure (connect, timeout, body read)
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, CrawlError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| CrawlError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| CrawlError::Http {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_page_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default())
            .unwrap();
        let body = fetch_page(&client, &format!("{}/page", server.uri()))
            .await
            .unwrap();

        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_page_non_2xx_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default())
            .unwrap();
        let result = fetch_page(&client, &format!("{}/missing", server.uri())).await;

        match result {
            Err(CrawlError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected status error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_fetch_page_network_failure_is_http_error() {
        // Nothing listens on this port
        let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default())
            .unwrap();
        let result = fetch_page(&client, "http://127.0.0.1:1/never").await;

        assert!(matches!(result, Err(CrawlError::Http { .. })));
    }
}

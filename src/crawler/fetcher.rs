//! Fetcher contract and the built-in HTTP fetcher
//!
//! The crawl engine talks to the network through the [`Fetcher`] trait so
//! that transports can be swapped out (or mocked) without touching the
//! orchestration logic. [`HttpFetcher`] is the reqwest-backed default; it
//! fetches a page and extracts raw `<a href>` links from the HTML body.

use crate::config::UserAgentConfig;
use crate::{Result, SpinneretError};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A single fetch request
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// The canonical URL to fetch
    pub url: String,

    /// Name of the fetcher implementation the caller wants
    pub fetcher: String,
}

/// A raw link discovered while fetching a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The href value as it appeared in the document, possibly relative
    pub url: String,

    /// The anchor text, if any
    pub text: Option<String>,
}

/// The outcome of a successful fetch
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The requested URL
    pub url: String,

    /// The page body
    pub html: String,

    /// Links discovered during the fetch; empty when the body was not HTML
    /// or came from a cache
    pub links: Vec<Link>,
}

/// A pluggable page fetcher
///
/// Implementations must be safe for concurrent use by multiple workers and
/// must respect the supplied cancellation token.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, cancel: &CancellationToken, request: &FetchRequest)
        -> Result<FetchResponse>;
}

/// The built-in HTTP fetcher
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds an HTTP fetcher with a client configured from the user agent
    /// settings
    ///
    /// # Example
    ///
    /// ```no_run
    /// use spinneret::config::UserAgentConfig;
    /// use spinneret::HttpFetcher;
    ///
    /// let fetcher = HttpFetcher::new(&UserAgentConfig::default()).unwrap();
    /// ```
    pub fn new(config: &UserAgentConfig) -> Result<Self> {
        let user_agent = if config.contact_url.is_empty() {
            format!("{}/{}", config.crawler_name, config.crawler_version)
        } else {
            format!(
                "{}/{} (+{})",
                config.crawler_name, config.crawler_version, config.contact_url
            )
        };

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    async fn do_fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let response = self
            .client
            .get(&request.url)
            .send()
            .await
            .map_err(|source| SpinneretError::Http {
                url: request.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpinneretError::HttpStatus {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        let html = response
            .text()
            .await
            .map_err(|source| SpinneretError::Http {
                url: request.url.clone(),
                source,
            })?;

        let links = if content_type.contains("text/html") {
            extract_links(&html)
        } else {
            Vec::new()
        };

        Ok(FetchResponse {
            url: request.url.clone(),
            html,
            links,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        cancel: &CancellationToken,
        request: &FetchRequest,
    ) -> Result<FetchResponse> {
        tokio::select! {
            _ = cancel.cancelled() => Err(SpinneretError::Cancelled),
            result = self.do_fetch(request) => result,
        }
    }
}

/// Extracts raw `<a href>` links from an HTML document
///
/// Links are returned as they appear in the document; resolution against the
/// page's host happens in the crawl engine. Anchors with a `download`
/// attribute are skipped.
fn extract_links(html: &str) -> Vec<Link> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut links = Vec::new();
    for element in document.select(&selector) {
        if element.value().attr("download").is_some() {
            continue;
        }
        if let Some(href) = element.value().attr("href") {
            let text = element.text().collect::<String>().trim().to_string();
            links.push(Link {
                url: href.to_string(),
                text: if text.is_empty() { None } else { Some(text) },
            });
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_fetcher() {
        let fetcher = HttpFetcher::new(&UserAgentConfig::default());
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_extract_links() {
        let html = r#"<html><body>
            <a href="/a">First</a>
            <a href="https://example.com/b">Second</a>
            <a href="/skip" download>Download</a>
        </body></html>"#;

        let links = extract_links(html);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "/a");
        assert_eq!(links[0].text.as_deref(), Some("First"));
        assert_eq!(links[1].url, "https://example.com/b");
    }

    #[test]
    fn test_extract_links_empty_body() {
        assert!(extract_links("").is_empty());
        assert!(extract_links("<html><body>no links</body></html>").is_empty());
    }

    #[test]
    fn test_extract_links_anchor_without_text() {
        let links = extract_links(r#"<a href="/x"><img src="pic.png"></a>"#);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, None);
    }
}

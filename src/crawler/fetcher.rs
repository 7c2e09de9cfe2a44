//! HTTP fetcher implementation
//!
//! This module performs the single fetch attempt a worker makes per URL:
//! - One GET with the crawler's user agent and a fixed request timeout
//! - Non-2xx responses and transport errors fail the attempt (no retry)
//! - The body is read to completion and handed to the HTML parser

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::parser::{parse_html, Page};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a fetch attempt failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("request timed out for {url}")]
    Timeout { url: String },

    #[error("request failed for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("status code {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use crawlstars::config::UserAgentConfig;
/// use crawlstars::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches and parses pages, one attempt per call
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from configuration
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(
            user_agent,
            crawler.request_timeout(),
        )?))
    }

    /// Fetches `url` once and parses the response into a page
    ///
    /// # Failure Modes
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | URL does not parse | `InvalidUrl` |
    /// | Request exceeds the timeout | `Timeout` |
    /// | Connection/TLS/redirect failure | `Transport` |
    /// | Non-2xx status | `Status` |
    /// | Body stream breaks off | `Body` |
    ///
    /// A document with no title, content or links is still a success.
    pub async fn fetch_page(&self, url: &str) -> Result<Page, FetchError> {
        let base = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(base.clone())
            .send()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        Ok(Page::from_parsed(url, parse_html(&body, &base)))
    }
}

fn classify_transport_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}

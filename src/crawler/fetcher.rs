//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the collector, including:
//! - Building HTTP clients with a browser-like header set
//! - Building the URL of each result page through the source
//! - GET requests to fetch page content
//! - Error classification (status, timeout, transport)
//!
//! Fetches are never retried; a failure ends the run.

use crate::config::HttpConfig;
use crate::crawler::traits::{PageContent, PageFetcher, Query};
use crate::sources::SearchSource;
use crate::{ConfigResult, FetchError};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use listing_sweep::config::HttpConfig;
/// use listing_sweep::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    if let Ok(language) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(header::ACCEPT_LANGUAGE, language);
    }
    headers.insert(header::DNT, HeaderValue::from_static("1"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page and classifies failures
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// * `Ok(PageContent)` - 2xx response with its body
/// * `Err(FetchError)` - Non-success status, timeout or transport failure
pub async fn fetch_url(client: &Client, url: &Url) -> Result<PageContent, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| classify_error(url, e))?;
    tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());

    Ok(PageContent::new(final_url, body))
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
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

/// Fetches result pages of a `SearchSource` over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher<S> {
    client: Client,
    source: S,
}

impl<S: SearchSource> HttpFetcher<S> {
    pub fn new(client: Client, source: S) -> Self {
        Self { client, source }
    }

    /// The source used to address result pages
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: SearchSource + Sync> PageFetcher for HttpFetcher<S> {
    fn check_query(&self, query: &Query) -> ConfigResult<()> {
        self.source.check_query(query)
    }

    async fn fetch_page(&self, query: &Query, page: u32) -> Result<PageContent, FetchError> {
        let url = self.source.page_url(query, page)?;
        tracing::debug!("GET {}", url);
        fetch_url(&self.client, &url).await
    }
}

//! Collaborator traits for the paginated collector
//!
//! The collector never talks to the network or parses markup itself. It asks
//! a `PageFetcher` for the content of page N and hands that content to a
//! `LinkExtractor`, which knows how one particular site marks up its listings.

use crate::{ConfigError, ConfigResult, ExtractError, FetchError, UrlResult};
use std::fmt;
use std::future::Future;

/// A raw link string as found in page content, before normalization
pub type CandidateLink = String;

/// A search term or seed URL, fixed for the duration of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Creates a query, rejecting empty or whitespace-only input
    ///
    /// Surrounding whitespace is trimmed.
    pub fn new(raw: &str) -> ConfigResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Validation("query cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the query text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw content of one fetched result page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// The URL the content was fetched from
    pub url: String,

    /// Page body (HTML)
    pub body: String,
}

impl PageContent {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }
}

/// Produces the content of a given result page
///
/// Implementations decide how page N of a query is addressed. A failed fetch
/// ends the run; the collector does not retry.
pub trait PageFetcher {
    /// Checks that `query` can be fetched at all
    ///
    /// Called once before the first fetch so malformed input is rejected
    /// without touching the network.
    fn check_query(&self, _query: &Query) -> ConfigResult<()> {
        Ok(())
    }

    /// Fetches page `page` (1-based) of the results for `query`
    fn fetch_page(
        &self,
        query: &Query,
        page: u32,
    ) -> impl Future<Output = Result<PageContent, FetchError>> + Send;
}

/// Site-specific link extraction rule
pub trait LinkExtractor {
    /// Extracts candidate links from page content, in document order
    ///
    /// Malformed individual entries should be skipped by the implementation.
    /// An error here means the whole page could not be processed.
    fn extract_links(&self, content: &PageContent) -> Result<Vec<CandidateLink>, ExtractError>;

    /// Reports whether the page is the last one
    ///
    /// `None` means the site exposes no usable "next page" signal.
    fn is_final_page(&self, _content: &PageContent) -> Option<bool> {
        None
    }

    /// Normalizes a candidate link, or rejects it
    ///
    /// The returned string is the de-duplication key and the form written to
    /// the output.
    fn normalize(&self, link: &str) -> UrlResult<String> {
        Ok(link.to_string())
    }
}

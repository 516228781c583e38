//! Airbnb search results
//!
//! The query is a complete Airbnb search URL, fetched as-is. Listing cards
//! are anchors annotated with `aria-labelledby` whose href starts with
//! `/rooms/{id}`; the raw markup is scanned with a regular expression since
//! the attributes sit next to each other in the rendered card.

use crate::crawler::{captures_in_markup, CandidateLink, LinkExtractor, PageContent, Query};
use crate::sources::{SearchSource, SourceKind};
use crate::url::LinkRule;
use crate::{ConfigError, ConfigResult, ExtractError, UrlError, UrlResult};
use regex::Regex;
use url::Url;

const LISTING_PATTERN: &str = r#"labelledby="[^"]+" href="(/rooms/\d+[^"]*)""#;

#[derive(Debug, Clone)]
pub struct AirbnbSource {
    pattern: Regex,
    rule: LinkRule,
}

impl AirbnbSource {
    pub fn new(base: Url) -> Result<Self, ExtractError> {
        Ok(Self {
            pattern: Regex::new(LISTING_PATTERN)?,
            rule: LinkRule::new(base).require_path("/rooms/"),
        })
    }
}

impl SearchSource for AirbnbSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Airbnb
    }

    /// Every page index maps to the seed URL; Airbnb runs are single-page
    fn page_url(&self, query: &Query, _page: u32) -> UrlResult<Url> {
        let url = Url::parse(query.as_str()).map_err(|e| UrlError::Parse(e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(url.scheme().to_string()));
        }
        Ok(url)
    }

    fn check_query(&self, query: &Query) -> ConfigResult<()> {
        self.page_url(query, 1).map(|_| ()).map_err(|e| {
            ConfigError::InvalidUrl(format!("Airbnb query must be a search URL: {}", e))
        })
    }
}

impl LinkExtractor for AirbnbSource {
    fn extract_links(&self, content: &PageContent) -> Result<Vec<CandidateLink>, ExtractError> {
        Ok(captures_in_markup(&content.body, &self.pattern))
    }

    fn normalize(&self, link: &str) -> UrlResult<String> {
        self.rule.apply(link)
    }
}

//! Walmart search results
//!
//! Result pages are addressed as `/search?q={query}&page={n}`. Every anchor
//! whose href contains `/ip/` is a product link. There is no "next page"
//! signal; runs end when a page comes back without product links.

use crate::crawler::{hrefs_matching, CandidateLink, LinkExtractor, PageContent, Query};
use crate::sources::{search_url, SearchSource, SourceKind};
use crate::url::LinkRule;
use crate::{ExtractError, UrlResult};
use scraper::Html;
use url::Url;

const PRODUCT_LINK: &str = r#"a[href*="/ip/"]"#;

#[derive(Debug, Clone)]
pub struct WalmartSource {
    base: Url,
    rule: LinkRule,
}

impl WalmartSource {
    pub fn new(base: Url) -> Self {
        let rule = LinkRule::new(base.clone()).require_path("/ip/");
        Self { base, rule }
    }
}

impl SearchSource for WalmartSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Walmart
    }

    fn page_url(&self, query: &Query, page: u32) -> UrlResult<Url> {
        search_url(
            &self.base,
            "/search",
            &[("q", query.as_str()), ("page", &page.to_string())],
        )
    }
}

impl LinkExtractor for WalmartSource {
    fn extract_links(&self, content: &PageContent) -> Result<Vec<CandidateLink>, ExtractError> {
        let document = Html::parse_document(&content.body);
        hrefs_matching(&document, PRODUCT_LINK)
    }

    fn normalize(&self, link: &str) -> UrlResult<String> {
        self.rule.apply(link)
    }
}

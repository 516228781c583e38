//! Amazon search results
//!
//! Result pages are addressed as `/s?k={query}&page={n}`. Each organic result
//! is a card tagged `data-component-type="s-search-result"` whose title link
//! carries the product URL. Amazon pages expose no usable "next page" signal
//! here, so runs end on the page cap or on an empty/repeated page.

use crate::crawler::{hrefs_in_containers, CandidateLink, LinkExtractor, PageContent, Query};
use crate::sources::{search_url, SearchSource, SourceKind};
use crate::url::LinkRule;
use crate::{ExtractError, UrlResult};
use scraper::Html;
use url::Url;

const RESULT_CARD: &str = r#"div[data-component-type="s-search-result"]"#;
const PRODUCT_LINK: &str = "a.a-link-normal.s-no-outline";

#[derive(Debug, Clone)]
pub struct AmazonSource {
    base: Url,
    rule: LinkRule,
}

impl AmazonSource {
    pub fn new(base: Url) -> Self {
        let rule = LinkRule::new(base.clone());
        Self { base, rule }
    }
}

impl SearchSource for AmazonSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Amazon
    }

    fn page_url(&self, query: &Query, page: u32) -> UrlResult<Url> {
        search_url(
            &self.base,
            "/s",
            &[("k", query.as_str()), ("page", &page.to_string())],
        )
    }
}

impl LinkExtractor for AmazonSource {
    fn extract_links(&self, content: &PageContent) -> Result<Vec<CandidateLink>, ExtractError> {
        let document = Html::parse_document(&content.body);
        hrefs_in_containers(&document, RESULT_CARD, PRODUCT_LINK)
    }

    fn normalize(&self, link: &str) -> UrlResult<String> {
        self.rule.apply(link)
    }
}

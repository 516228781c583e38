//! eBay search results
//!
//! Result pages are addressed as `/sch/i.html?_nkw={query}&_ipg=240`, with
//! `&_pgn={n}` added from page 2 on. Listings are wrapped in `s-item`
//! containers whose `a.s-item__link` points at `/itm/{id}`; eBay has shipped
//! several wrapper layouts, so extraction tries them in order. Pages carry a
//! "Next page" control until the last one.

use crate::crawler::{
    count_elements, has_element, hrefs_in_containers, CandidateLink, LinkExtractor, PageContent,
    Query,
};
use crate::sources::{search_url, SearchSource, SourceKind};
use crate::url::LinkRule;
use crate::{ExtractError, UrlResult};
use scraper::Html;
use url::Url;

/// Listing containers, most specific layout first
const LISTING_CONTAINERS: &[&str] = &["div.s-item__wrapper", "div.s-item", "a.s-item__link"];
const ITEM_LINK: &str = "a.s-item__link";
const NEXT_PAGE: &str = r#"a[aria-label="Next page"]"#;
const ITEMS_PER_PAGE: &str = "240";

#[derive(Debug, Clone)]
pub struct EbaySource {
    base: Url,
    rule: LinkRule,
}

impl EbaySource {
    pub fn new(base: Url) -> Self {
        let rule = LinkRule::new(base.clone())
            .require_path("/itm/")
            .strip_query(true);
        Self { base, rule }
    }
}

impl SearchSource for EbaySource {
    fn kind(&self) -> SourceKind {
        SourceKind::Ebay
    }

    fn page_url(&self, query: &Query, page: u32) -> UrlResult<Url> {
        let page_number: String;
        let mut params = vec![("_nkw", query.as_str()), ("_ipg", ITEMS_PER_PAGE)];
        if page > 1 {
            page_number = page.to_string();
            params.push(("_pgn", page_number.as_str()));
        }
        search_url(&self.base, "/sch/i.html", &params)
    }
}

impl LinkExtractor for EbaySource {
    fn extract_links(&self, content: &PageContent) -> Result<Vec<CandidateLink>, ExtractError> {
        let document = Html::parse_document(&content.body);

        for container in LISTING_CONTAINERS {
            if count_elements(&document, container)? > 0 {
                tracing::trace!("eBay listings matched '{}'", container);
                return hrefs_in_containers(&document, container, ITEM_LINK);
            }
        }

        Ok(Vec::new())
    }

    fn is_final_page(&self, content: &PageContent) -> Option<bool> {
        let document = Html::parse_document(&content.body);
        has_element(&document, NEXT_PAGE).ok().map(|has_next| !has_next)
    }

    fn normalize(&self, link: &str) -> UrlResult<String> {
        self.rule.apply(link)
    }
}

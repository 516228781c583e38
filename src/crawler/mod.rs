//! Crawler module for paginated link collection
//!
//! This module contains the core collection logic, including:
//! - The fetch/extract/dedupe/terminate loop
//! - Collaborator traits for page fetching and link extraction
//! - HTTP fetching without retries
//! - HTML helpers for link extraction
//! - Randomized inter-request delays

mod collector;
mod delay;
mod fetcher;
mod parser;
mod seen;
mod traits;

pub use collector::{
    CollectorSettings, PageReport, PaginatedLinkCollector, RunResult, TerminationPolicy,
};
pub use delay::DelayRange;
pub use fetcher::{build_http_client, fetch_url, HttpFetcher};
pub use parser::{
    captures_in_markup, count_elements, has_element, hrefs_in_containers, hrefs_matching,
    parse_selector,
};
pub use seen::SeenSet;
pub use traits::{CandidateLink, LinkExtractor, PageContent, PageFetcher, Query};

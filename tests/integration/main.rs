//! Integration tests for listing-sweep
//!
//! These tests use wiremock to serve result pages and drive the real HTTP
//! fetcher, sources and collector end to end.

mod collect_tests;
mod output_tests;

use listing_sweep::config::HttpConfig;
use listing_sweep::crawler::{
    build_http_client, CollectorSettings, DelayRange, HttpFetcher, PaginatedLinkCollector,
    TerminationPolicy,
};
use listing_sweep::sources::Source;
use listing_sweep::SourceKind;
use url::Url;
use wiremock::MockServer;

/// Builds a fetcher for `kind` rooted at the mock server
pub fn fetcher_for(kind: SourceKind, server: &MockServer) -> HttpFetcher<Source> {
    fetcher_at(kind, &server.uri(), &HttpConfig::default())
}

/// Builds a fetcher for `kind` rooted at `base` with the given HTTP settings
pub fn fetcher_at(kind: SourceKind, base: &str, http: &HttpConfig) -> HttpFetcher<Source> {
    let base = Url::parse(base).expect("Failed to parse base URL");
    let source = Source::new(kind, base).expect("Failed to build source");
    let client = build_http_client(http).expect("Failed to build client");
    HttpFetcher::new(client, source)
}

/// Returns a base URL on a local port nothing listens on
pub fn closed_port_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("No local address").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Builds a collector with no delay between pages
pub fn collector(max_pages: u32) -> PaginatedLinkCollector {
    PaginatedLinkCollector::new(CollectorSettings {
        max_pages,
        delay: DelayRange::none(),
        policy: TerminationPolicy::default(),
    })
    .expect("Failed to build collector")
}

/// Wraps listing markup in a minimal HTML document
pub fn page(body: &str) -> String {
    format!("<html><head><title>Results</title></head><body>{}</body></html>", body)
}

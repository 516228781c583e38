//! End-to-end collection runs against mock result pages

use crate::{closed_port_base, collector, fetcher_at, fetcher_for, page};
use listing_sweep::config::HttpConfig;
use listing_sweep::crawler::{fetch_url, HttpFetcher, PageContent, PageFetcher, Query};
use listing_sweep::sources::{SearchSource, Source};
use listing_sweep::{FetchError, RunOutcome, SourceKind, StopReason};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ebay_item(id: u32) -> String {
    format!(
        r#"<div class="s-item__wrapper"><a class="s-item__link" href="/itm/{id}?hash=item{id}">Item {id}</a></div>"#
    )
}

const EBAY_NEXT: &str = r#"<a aria-label="Next page" href="?_pgn=2">Next</a>"#;

#[tokio::test]
async fn test_ebay_stops_when_next_control_missing() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .and(query_param("_pgn", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(&format!(
            "{}{}",
            ebay_item(2),
            ebay_item(3)
        ))))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .and(query_param("_nkw", "desk lamp"))
        .and(query_param("_ipg", "240"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(&format!(
            "{}{}{}",
            ebay_item(1),
            ebay_item(2),
            EBAY_NEXT
        ))))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(SourceKind::Ebay, &server);
    let result = collector(5)
        .collect("desk lamp", &fetcher, fetcher.source(), &CancellationToken::new())
        .await
        .expect("Run should start");

    assert_eq!(
        result.links,
        vec![
            format!("{}/itm/1", uri),
            format!("{}/itm/2", uri),
            format!("{}/itm/3", uri),
        ]
    );
    assert_eq!(result.pages_fetched, 2);
    assert_eq!(
        result.outcome,
        RunOutcome::Completed {
            page: 2,
            reason: StopReason::NoNextPage
        }
    );
}

#[tokio::test]
async fn test_ebay_ignores_non_item_links() {
    let server = MockServer::start().await;
    let uri = server.uri();

    let body = page(
        r#"<div class="s-item"><a class="s-item__link" href="/itm/7">Seven</a></div>
           <div class="s-item"><a class="s-item__link" href="/sch/ads/promo">Ad</a></div>"#,
    );
    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(SourceKind::Ebay, &server);
    let result = collector(1)
        .collect("lamp", &fetcher, fetcher.source(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.links, vec![format!("{}/itm/7", uri)]);
}

#[tokio::test]
async fn test_walmart_failure_keeps_partial_results() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "usb cable"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(&format!(
            r#"<a href="/ip/Cable-A/1">A</a><a href="/browse/cables">Browse</a><a href="{}/ip/Cable-B/2">B</a>"#,
            uri
        ))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(SourceKind::Walmart, &server);
    let result = collector(5)
        .collect("usb cable", &fetcher, fetcher.source(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        result.links,
        vec![
            format!("{}/ip/Cable-A/1", uri),
            format!("{}/ip/Cable-B/2", uri),
        ]
    );
    assert_eq!(result.pages_fetched, 1);
    assert!(!result.is_complete());
    match &result.outcome {
        RunOutcome::FetchFailed { page, reason } => {
            assert_eq!(*page, 2);
            assert!(reason.contains("503"));
        }
        other => panic!("Expected fetch failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_amazon_single_page_cap() {
    let server = MockServer::start().await;
    let uri = server.uri();

    let body = page(
        r#"<div data-component-type="s-search-result"><a class="a-link-normal s-no-outline" href="/dp/B0001">One</a></div>
           <div data-component-type="s-search-result"><a class="a-link-normal s-no-outline" href="/dp/B0002?utm_source=x">Two</a></div>"#,
    );
    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("k", "desk lamp"))
        .and(query_param("page", "1"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept-language"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(SourceKind::Amazon, &server);
    let result = collector(1)
        .collect("desk lamp", &fetcher, fetcher.source(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        result.links,
        vec![format!("{}/dp/B0001", uri), format!("{}/dp/B0002", uri)]
    );
    assert_eq!(
        result.outcome,
        RunOutcome::Completed {
            page: 1,
            reason: StopReason::PageCapReached
        }
    );
}

#[tokio::test]
async fn test_amazon_empty_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(page("<p>No results for your search.</p>")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(SourceKind::Amazon, &server);
    let result = collector(5)
        .collect("zzzz", &fetcher, fetcher.source(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(
        result.outcome,
        RunOutcome::Completed {
            page: 1,
            reason: StopReason::EmptyPage
        }
    );
}

#[tokio::test]
async fn test_airbnb_seed_url() {
    let server = MockServer::start().await;
    let uri = server.uri();

    let body = page(
        r#"<a aria-labelledby="title_111" href="/rooms/111?adults=2&amp;check_in=2024-06-01">Flat</a>
           <a aria-labelledby="title_222" href="/rooms/222?adults=2">Loft</a>
           <a aria-labelledby="title_111" href="/rooms/111?adults=2&amp;check_in=2024-06-01">Flat again</a>
           <a href="/help">Help</a>"#,
    );
    Mock::given(method("GET"))
        .and(path("/s/Lisbon/homes"))
        .and(query_param("adults", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(SourceKind::Airbnb, &server);
    let seed = format!("{}/s/Lisbon/homes?adults=2", uri);
    let result = collector(1)
        .collect(&seed, &fetcher, fetcher.source(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        result.links,
        vec![
            format!("{}/rooms/111?adults=2&check_in=2024-06-01", uri),
            format!("{}/rooms/222?adults=2", uri),
        ]
    );
    assert!(result.is_complete());
}

#[tokio::test]
async fn test_airbnb_rejects_search_term_before_fetching() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(SourceKind::Airbnb, &server);
    let result = collector(1)
        .collect("lisbon", &fetcher, fetcher.source(), &CancellationToken::new())
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_cancelled_run_fetches_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let fetcher = fetcher_for(SourceKind::Walmart, &server);
    let result = collector(5)
        .collect("lamp", &fetcher, fetcher.source(), &cancel)
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.pages_fetched, 0);
    assert_eq!(result.outcome, RunOutcome::Cancelled { page: 1 });
}

/// Serves page 1 from one fetcher and every later page from another
struct SplitFetcher {
    first: HttpFetcher<Source>,
    rest: HttpFetcher<Source>,
}

impl PageFetcher for SplitFetcher {
    async fn fetch_page(&self, query: &Query, page: u32) -> Result<PageContent, FetchError> {
        if page == 1 {
            self.first.fetch_page(query, page).await
        } else {
            self.rest.fetch_page(query, page).await
        }
    }
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page(r#"<a href="/ip/Lamp/1">Lamp</a>"#))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let http = HttpConfig {
        timeout_secs: 1,
        ..HttpConfig::default()
    };
    let fetcher = fetcher_at(SourceKind::Walmart, &server.uri(), &http);

    let query = Query::new("lamp").unwrap();
    let url = fetcher.source().page_url(&query, 1).unwrap();
    let client = listing_sweep::crawler::build_http_client(&http).unwrap();
    assert!(matches!(
        fetch_url(&client, &url).await,
        Err(FetchError::Timeout { .. })
    ));

    let result = collector(5)
        .collect("lamp", &fetcher, fetcher.source(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.pages_fetched, 0);
    match &result.outcome {
        RunOutcome::FetchFailed { page, reason } => {
            assert_eq!(*page, 1);
            assert!(reason.to_lowercase().contains("timeout"), "{}", reason);
        }
        other => panic!("Expected fetch failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_refused_connection_keeps_earlier_links() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(
            r#"<a href="/ip/Lamp/1">Lamp</a><a href="/ip/Shade/2">Shade</a>"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let closed = closed_port_base();
    let http = HttpConfig::default();
    let dead = fetcher_at(SourceKind::Walmart, &closed, &http);

    let query = Query::new("lamp").unwrap();
    let url = dead.source().page_url(&query, 2).unwrap();
    let client = listing_sweep::crawler::build_http_client(&http).unwrap();
    assert!(matches!(
        fetch_url(&client, &url).await,
        Err(FetchError::Transport { .. })
    ));

    let fetcher = SplitFetcher {
        first: fetcher_for(SourceKind::Walmart, &server),
        rest: dead,
    };
    let result = collector(5)
        .collect("lamp", &fetcher, fetcher.first.source(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        result.links,
        vec![format!("{}/ip/Lamp/1", uri), format!("{}/ip/Shade/2", uri)]
    );
    assert_eq!(result.pages_fetched, 1);
    match &result.outcome {
        RunOutcome::FetchFailed { page, reason } => {
            assert_eq!(*page, 2);
            assert!(reason.contains(&closed), "{}", reason);
        }
        other => panic!("Expected fetch failure, got {:?}", other),
    }
}

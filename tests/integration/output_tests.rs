//! Collected links written to CSV

use crate::{collector, fetcher_for, page};
use listing_sweep::crawler::Query;
use listing_sweep::output::{default_file_name, write_csv};
use listing_sweep::SourceKind;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_run_written_to_csv() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(
            r#"<a href="/ip/Lamp/1">Lamp</a><a href="/ip/Lamp/1">Lamp again</a><a href="/ip/Shade/2">Shade</a>"#,
        )))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(SourceKind::Walmart, &server);
    let result = collector(1)
        .collect("lamp", &fetcher, fetcher.source(), &CancellationToken::new())
        .await
        .unwrap();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let query = Query::new("lamp").unwrap();
    let path = dir
        .path()
        .join(default_file_name(SourceKind::Walmart, &query, &chrono::Local::now()));

    let written = write_csv(&path, "Product URL", &result).expect("Failed to write CSV");
    assert_eq!(written, 2);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        format!("Product URL\n{uri}/ip/Lamp/1\n{uri}/ip/Shade/2\n")
    );
    assert!(path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("walmart_lamp_") && n.ends_with(".csv")));
}

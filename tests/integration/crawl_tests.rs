use crate::{html, test_crawler};
use prospector::crawler::CrawlOutcome;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn start_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).unwrap()
}

#[tokio::test]
async fn test_single_page_site() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            "<html><head><title>Acme</title></head><body><p>We make anvils.</p></body></html>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_crawler(2).crawl(&start_url(&server), 5).await;

    assert_eq!(result.len(), 1);
    assert_eq!(result.outcome, CrawlOutcome::Exhausted);
    let page = &result.pages[0];
    assert_eq!(page.url, start_url(&server).as_str());
    assert_eq!(page.title.as_deref(), Some("Acme"));
    assert!(page.content.contains("We make anvils."));
    assert_eq!(page.metadata.status, 200);
}

#[tokio::test]
async fn test_follows_same_site_links_breadth_first() {
    let server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(html(
            r#"<a href="/about">About</a><a href="/menu#top">Menu</a><a href="https://other.example/">Out</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(path("/about"))
        .respond_with(html(r#"<p>About us</p><a href="/team">Team</a>"#))
        .mount(&server)
        .await;
    Mock::given(path("/menu"))
        .respond_with(html("<p>Menu</p>"))
        .mount(&server)
        .await;
    Mock::given(path("/team"))
        .respond_with(html("<p>Team</p>"))
        .mount(&server)
        .await;

    let base = start_url(&server);
    let result = test_crawler(1).crawl(&base, 10).await;

    let expected: Vec<String> = ["", "about", "menu", "team"]
        .iter()
        .map(|p| base.join(p).unwrap().to_string())
        .collect();
    assert_eq!(result.urls(), expected);
}

#[tokio::test]
async fn test_cycle_terminates() {
    let server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(html(r#"<a href="/b">B</a>"#))
        .mount(&server)
        .await;
    Mock::given(path("/b"))
        .respond_with(html(r#"<a href="/">A</a><a href="/b">self</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_crawler(2).crawl(&start_url(&server), 5).await;

    assert_eq!(result.len(), 2);
    assert_eq!(result.outcome, CrawlOutcome::Exhausted);
}

#[tokio::test]
async fn test_budget_limits_pages() {
    let server = MockServer::start().await;
    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/p{}">{}</a>"#, i, i))
        .collect();
    Mock::given(path("/"))
        .respond_with(html(&links))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html("<p>leaf</p>"))
        .mount(&server)
        .await;

    let result = test_crawler(4).crawl(&start_url(&server), 5).await;

    assert_eq!(result.len(), 5);
    assert_eq!(result.outcome, CrawlOutcome::BudgetReached);
    let mut urls = result.urls();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 5);
}

#[tokio::test]
async fn test_missing_page_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(html(r#"<a href="/gone">Gone</a><a href="/ok">Ok</a>"#))
        .mount(&server)
        .await;
    Mock::given(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/ok"))
        .respond_with(html("<p>fine</p>"))
        .mount(&server)
        .await;

    let base = start_url(&server);
    let result = test_crawler(1).crawl(&base, 5).await;

    assert_eq!(result.len(), 2);
    assert_eq!(result.failed, 1);
    assert!(!result.urls().contains(&base.join("gone").unwrap().as_str()));
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(path("/"))
        .respond_with(html("<p>back up</p>"))
        .mount(&server)
        .await;

    let result = test_crawler(1).crawl(&start_url(&server), 5).await;

    assert_eq!(result.len(), 1);
    assert!(result.pages[0].content.contains("back up"));
}

#[tokio::test]
async fn test_non_html_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(html(r#"<a href="/brochure.pdf">Brochure</a>"#))
        .mount(&server)
        .await;
    Mock::given(path("/brochure.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = test_crawler(1).crawl(&start_url(&server), 5).await;

    assert_eq!(result.len(), 1);
    assert_eq!(result.failed, 1);
}

#[tokio::test]
async fn test_unreachable_start_url_yields_empty_result() {
    let server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = test_crawler(1).crawl(&start_url(&server), 5).await;

    assert!(result.is_empty());
    assert_eq!(result.outcome, CrawlOutcome::Exhausted);
}

#[tokio::test]
async fn test_meta_description_and_keywords() {
    let server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(html(
            r#"<html><head>
                <meta name="description" content="Wood-fired pizza in Portland">
                <meta name="keywords" content="pizza, portland">
            </head><body>Hello</body></html>"#,
        ))
        .mount(&server)
        .await;

    let result = test_crawler(1).crawl(&start_url(&server), 5).await;

    let metadata = &result.pages[0].metadata;
    assert_eq!(
        metadata.description.as_deref(),
        Some("Wood-fired pizza in Portland")
    );
    assert_eq!(metadata.keywords.as_deref(), Some("pizza, portland"));
    assert!(metadata
        .headers
        .get("content-type")
        .is_some_and(|v| v.starts_with("text/html")));
}

#[tokio::test]
async fn test_cancelled_crawl_returns_no_new_pages() {
    let server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(html("<p>never fetched</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = test_crawler(1)
        .crawl_with_cancellation(&start_url(&server), 5, &cancel)
        .await;

    assert!(result.is_empty());
    assert_eq!(result.outcome, CrawlOutcome::Cancelled);
}

#[tokio::test]
async fn test_crawl_target_rejects_empty_crawl() {
    let server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = prospector::pipeline::crawl_target(
        &test_crawler(1),
        &start_url(&server),
        5,
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        prospector::ProspectorError::EmptyCrawl { .. }
    ));
}

#[tokio::test]
async fn test_start_url_redirect_to_other_origin_is_followed() {
    let server = MockServer::start().await;
    let port = Url::parse(&server.uri()).unwrap().port().unwrap();
    let landing = format!("http://localhost:{}/home", port);

    Mock::given(path("/"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", landing.as_str()))
        .mount(&server)
        .await;
    Mock::given(path("/home"))
        .respond_with(html(r#"<a href="/about">About</a><a href="/menu">Menu</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html("<p>leaf</p>"))
        .mount(&server)
        .await;

    let result = test_crawler(1).crawl(&start_url(&server), 5).await;

    assert_eq!(
        result.urls(),
        vec![
            start_url(&server).to_string(),
            format!("http://localhost:{}/about", port),
            format!("http://localhost:{}/menu", port),
        ]
    );
}

#[tokio::test]
async fn test_cancellation_keeps_completed_pages() {
    let server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(html(r#"<p>Home</p><a href="/next">Next</a>"#))
        .mount(&server)
        .await;
    Mock::given(path("/next"))
        .respond_with(html("<p>Slow</p>").set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = test_crawler(1)
        .crawl_with_cancellation(&start_url(&server), 5, &cancel)
        .await;

    assert_eq!(result.len(), 1);
    assert_eq!(result.outcome, CrawlOutcome::Cancelled);
    assert_eq!(result.attempted, 2);
    assert!(started.elapsed() < Duration::from_secs(5));
}

use prospector::config::SearchConfig;
use prospector::search::{format_results, ExaSearcher, WebSearcher};
use prospector::SearchError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn searcher(server: &MockServer) -> ExaSearcher {
    let config = SearchConfig {
        base_url: server.uri(),
        ..SearchConfig::default()
    };
    ExaSearcher::new(reqwest::Client::new(), "exa-test-key", &config)
}

#[tokio::test]
async fn test_exa_search_request_and_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("x-api-key", "exa-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {
                    "url": "https://news.example/acme-expands",
                    "title": "Acme opens ten new stores",
                    "text": "Acme Pizza announced...",
                    "publishedDate": "2024-03-01"
                },
                { "url": "https://acme.example/", "title": null }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = searcher(&server).search("acme pizza", 50).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].published_date.as_deref(), Some("2024-03-01"));
    assert_eq!(results[1].title, None);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["query"], "acme pizza");
    assert_eq!(body["numResults"], 10);
    assert_eq!(body["useAutoprompt"], true);
    assert_eq!(body["contents"]["text"], true);

    let text = format_results("acme pizza", &results);
    assert!(text.starts_with("Search results for 'acme pizza':"));
    assert!(text.contains("[1] Acme opens ten new stores\nURL: https://news.example/acme-expands\nPublished: 2024-03-01\n"));
    assert!(text.contains("[2] (untitled)"));
}

#[tokio::test]
async fn test_exa_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = searcher(&server).search("acme", 3).await.unwrap_err();

    match err {
        SearchError::Api { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

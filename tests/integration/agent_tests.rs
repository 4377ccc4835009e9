use crate::{html, test_crawler};
use prospector::agent::ChatClient;
use prospector::config::{AgentConfig, SearchConfig};
use prospector::crawler::{PageMetadata, PageRecord};
use prospector::pipeline::Researcher;
use prospector::search::ExaSearcher;
use prospector::{AgentError, ProspectorError};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPORT_JSON: &str = r#"{
    "summary": "Acme Pizza is a regional chain.",
    "key_points": ["Wood-fired ovens"],
    "recommendations": ["Pitch catering software"],
    "sources": [{"url": "https://acme.example/", "method": "crawl", "relevance": "Home page"}]
}"#;

fn researcher(server: &MockServer, agent: AgentConfig) -> Researcher {
    let chat = ChatClient::new(reqwest::Client::new(), "test-key", server.uri());
    let search_config = SearchConfig {
        base_url: server.uri(),
        ..SearchConfig::default()
    };
    let searcher = ExaSearcher::new(reqwest::Client::new(), "exa-key", &search_config);
    Researcher::new(
        chat,
        Arc::new(searcher),
        Arc::new(test_crawler(1)),
        agent,
        3,
    )
}

fn crawled_pages() -> Vec<PageRecord> {
    vec![PageRecord {
        url: "https://acme.example/".to_string(),
        title: Some("Acme Pizza".to_string()),
        content: "Wood-fired pizza since 1982".to_string(),
        metadata: PageMetadata::default(),
    }]
}

fn tool_call(name: &str, arguments: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": name, "arguments": arguments.to_string() }
                }]
            }
        }]
    }))
}

fn final_answer(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

/// Bodies of every chat-completions request the mock received, in order
async fn chat_requests(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/chat/completions")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

/// Content of the last `role: tool` message in a request body
fn last_tool_message(request: &Value) -> String {
    request["messages"]
        .as_array()
        .unwrap()
        .iter()
        .rev()
        .find(|m| m["role"] == "tool")
        .and_then(|m| m["content"].as_str())
        .unwrap()
        .to_string()
}

fn target() -> Url {
    Url::parse("https://acme.example/").unwrap()
}

#[tokio::test]
async fn test_agent_uses_tool_then_returns_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(tool_call("get_page_content", json!({ "page_number": 0 })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(final_answer(REPORT_JSON))
        .mount(&server)
        .await;

    let report = researcher(&server, AgentConfig::default())
        .write_report(&target(), crawled_pages(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.summary, "Acme Pizza is a regional chain.");
    assert_eq!(report.sources[0].method, "crawl");

    let requests = chat_requests(&server).await;
    assert_eq!(requests.len(), 2);

    let first = &requests[0];
    assert_eq!(first["model"], "gpt-4o");
    assert_eq!(first["response_format"]["type"], "json_object");
    assert_eq!(first["tools"].as_array().unwrap().len(), 3);
    let prompt = first["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.starts_with("I have crawled 1 pages from https://acme.example/"));

    assert_eq!(
        last_tool_message(&requests[1]),
        "URL: https://acme.example/\nTitle: Acme Pizza\nContent: Wood-fired pizza since 1982"
    );
}

#[tokio::test]
async fn test_search_failure_is_reported_to_agent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(tool_call("search_web", json!({ "query": "acme pizza news" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(final_answer(REPORT_JSON))
        .mount(&server)
        .await;

    let result = researcher(&server, AgentConfig::default())
        .write_report(&target(), crawled_pages(), &CancellationToken::new())
        .await;

    assert!(result.is_ok());
    let requests = chat_requests(&server).await;
    assert!(last_tool_message(&requests[1]).starts_with("Search failed: "));
}

#[tokio::test]
async fn test_additional_crawl_respects_cumulative_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/partner/"))
        .respond_with(html(r#"<p>Partner</p><a href="/partner/a">A</a><a href="/partner/b">B</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html("<p>leaf</p>"))
        .mount(&server)
        .await;
    let partner_url = format!("{}/partner/", server.uri());
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(tool_call(
            "crawl_additional_site",
            json!({ "url": partner_url, "max_pages": 5 }),
        ))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(final_answer(REPORT_JSON))
        .mount(&server)
        .await;

    let agent = AgentConfig {
        max_additional_pages: 2,
        ..AgentConfig::default()
    };
    researcher(&server, agent)
        .write_report(&target(), crawled_pages(), &CancellationToken::new())
        .await
        .unwrap();

    let requests = chat_requests(&server).await;
    assert_eq!(requests.len(), 3);
    assert!(last_tool_message(&requests[1]).starts_with(&format!("Crawled 2 pages from {}", partner_url)));
    assert!(last_tool_message(&requests[2]).starts_with("Additional crawling budget exhausted"));

    let page_fetches = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.to_string() == "GET")
        .count();
    assert_eq!(page_fetches, 2);
}

#[tokio::test]
async fn test_agent_stops_at_max_iterations() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(tool_call("get_page_content", json!({ "page_number": 0 })))
        .mount(&server)
        .await;

    let agent = AgentConfig {
        max_iterations: 2,
        ..AgentConfig::default()
    };
    let err = researcher(&server, agent)
        .write_report(&target(), crawled_pages(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProspectorError::Agent(AgentError::MaxIterations(2))
    ));
    assert_eq!(chat_requests(&server).await.len(), 2);
}

#[tokio::test]
async fn test_api_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream overloaded"))
        .mount(&server)
        .await;

    let err = researcher(&server, AgentConfig::default())
        .write_report(&target(), crawled_pages(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        ProspectorError::Agent(AgentError::Api { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream overloaded");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_answer_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(final_answer("Here is your report: Acme is great."))
        .mount(&server)
        .await;

    let err = researcher(&server, AgentConfig::default())
        .write_report(&target(), crawled_pages(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ProspectorError::Agent(AgentError::Parse(_))));
}

#[tokio::test]
async fn test_malformed_tool_call_gets_error_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_bad",
                        "type": "function",
                        "function": { "name": "get_page_content", "arguments": { "page_number": 0 } }
                    }]
                }
            }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(final_answer(REPORT_JSON))
        .mount(&server)
        .await;

    researcher(&server, AgentConfig::default())
        .write_report(&target(), crawled_pages(), &CancellationToken::new())
        .await
        .unwrap();

    let requests = chat_requests(&server).await;
    assert_eq!(requests.len(), 2);
    let reply = requests[1]["messages"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["role"] == "tool")
        .unwrap();
    assert_eq!(reply["tool_call_id"], "call_bad");
    assert_eq!(reply["content"], "Error: malformed tool call");
}

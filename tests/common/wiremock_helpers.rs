use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a mock company-registry server answering `/search?q=<query>`
/// with the given results array in the recherche-entreprises JSON shape.
pub async fn mock_registry_server(query: &str, results: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", query))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "results": results }))
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    server
}

/// Creates a mock search server returning DuckDuckGo-shaped result HTML.
pub async fn mock_search_server(title: &str, url: &str, body: &str) -> MockServer {
    let server = MockServer::start().await;

    let html = format!(
        r#"<html><body><div class="results">
            <div class="result">
              <h2 class="result__title"><a class="result__a" href="{url}">{title}</a></h2>
              <a class="result__snippet">{body}</a>
            </div>
        </div></body></html>"#
    );

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    server
}

/// Creates a mock generateContent endpoint whose model answer is the given
/// JSON verdict payload.
pub async fn mock_ai_server(verdict: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;

    let response = json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": verdict.to_string() }]
            }
        }]
    });

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(response)
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    server
}

/// Creates a mock HTTP server that returns the specified error status code.
pub async fn mock_error_server(status_code: u16) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status_code))
        .mount(&server)
        .await;

    server
}

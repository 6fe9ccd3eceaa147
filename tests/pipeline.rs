mod helpers;

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use helpers::{ARTICLE_HTML, ScriptedClient, fast_fetch_settings, test_app, test_service};
use reqwest::StatusCode as HttpStatus;
use serde_json::{Value, json};
use titlecraft::generator::CompletionError;
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const BOILERPLATE_HTML: &str =
    include_str!("../src/extractor/tests/fixtures/boilerplate_only.html");

async fn serve_page(mock_server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html, "text/html; charset=utf-8"),
        )
        .mount(mock_server)
        .await;
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_titles(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/titles")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_article_yields_partial_title_list() {
    let mock_server = MockServer::start().await;
    serve_page(&mock_server, "/article", ARTICLE_HTML).await;

    let client = ScriptedClient::replying(
        "1. **Why Rivers Remember**\n2. \"The Slow Work of Water\"\n3. Mapping a Changing Delta",
    );
    let service = test_service(client.clone(), fast_fetch_settings(3));

    let titles = service
        .generate_titles_from_url(&format!("{}/article", mock_server.uri()), 5)
        .await
        .unwrap();

    assert_eq!(
        titles.into_inner(),
        vec![
            "Why Rivers Remember",
            "The Slow Work of Water",
            "Mapping a Changing Delta"
        ]
    );
    assert_eq!(client.calls(), 1);

    let prompt = client.last_prompt().unwrap();
    assert!(prompt.contains("Generate exactly 5 titles"));
    // navigation chrome is stripped before the text reaches the model
    assert!(!prompt.contains("Subscribe"));
}

#[tokio::test]
async fn test_long_page_is_truncated_before_generation() {
    let mock_server = MockServer::start().await;
    let paragraph = "Tidal marshes store carbon in layered sediment over centuries. ".repeat(20);
    let html = format!(
        "<html><body><article>{}</article></body></html>",
        format!("<p>{paragraph}</p>").repeat(20)
    );
    serve_page(&mock_server, "/long", &html).await;

    let client = ScriptedClient::replying("1. Carbon in the Marsh");
    let service = test_service(client.clone(), fast_fetch_settings(1));

    service
        .generate_titles_from_url(&format!("{}/long", mock_server.uri()), 1)
        .await
        .unwrap();

    let prompt = client.last_prompt().unwrap();
    let submitted = prompt.matches("Tidal marshes").count();
    // 8000 chars of source at ~63 chars per sentence
    assert!(submitted < 130, "submitted {submitted} sentences");
    assert!(submitted > 100, "submitted {submitted} sentences");
}

#[tokio::test]
async fn test_timeouts_surface_as_unreachable_without_model_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(ARTICLE_HTML, "text/html")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = ScriptedClient::replying("1. Never Used");
    let service = test_service(client.clone(), fast_fetch_settings(3));

    let err = service
        .generate_titles_from_url(&format!("{}/slow", mock_server.uri()), 5)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "UnreachableUrl");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_not_found_page_is_unreachable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ScriptedClient::replying("1. Never Used");
    let service = test_service(client.clone(), fast_fetch_settings(3));

    let err = service
        .generate_titles_from_url(&format!("{}/gone", mock_server.uri()), 5)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "UnreachableUrl");
    assert_eq!(err.status_code(), HttpStatus::BAD_GATEWAY);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_boilerplate_page_is_insufficient_content() {
    let mock_server = MockServer::start().await;
    serve_page(&mock_server, "/empty", BOILERPLATE_HTML).await;

    let client = ScriptedClient::replying("1. Never Used");
    let service = test_service(client.clone(), fast_fetch_settings(3));

    let err = service
        .generate_titles_from_url(&format!("{}/empty", mock_server.uri()), 5)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "InsufficientContent");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_model_failures_are_classified() {
    let mock_server = MockServer::start().await;
    serve_page(&mock_server, "/article", ARTICLE_HTML).await;
    let url = format!("{}/article", mock_server.uri());

    let missing_key = test_service(
        ScriptedClient::failing(|| CompletionError::MissingApiKey),
        fast_fetch_settings(1),
    );
    let err = missing_key.generate_titles_from_url(&url, 3).await.unwrap_err();
    assert_eq!(err.kind(), "ModelUnavailable");

    let server_error = test_service(
        ScriptedClient::failing(|| CompletionError::Http {
            status: HttpStatus::INTERNAL_SERVER_ERROR,
            body: "upstream exploded".to_string(),
        }),
        fast_fetch_settings(1),
    );
    let err = server_error.generate_titles_from_url(&url, 3).await.unwrap_err();
    assert_eq!(err.kind(), "GenerationFailed");

    let rambling = test_service(
        ScriptedClient::replying("**\n\n---\n\n"),
        fast_fetch_settings(1),
    );
    let err = rambling.generate_titles_from_url(&url, 3).await.unwrap_err();
    assert_eq!(err.kind(), "GenerationFailed");
}

#[tokio::test]
async fn test_http_endpoint_end_to_end() {
    let mock_server = MockServer::start().await;
    serve_page(&mock_server, "/article", ARTICLE_HTML).await;

    let client = ScriptedClient::replying("1. One\n2. Two");
    let app = test_app(client.clone(), fast_fetch_settings(3));

    let response = app
        .oneshot(post_titles(json!({
            "url": format!("{}/article", mock_server.uri()),
            "numTitles": 2
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(json_body(response).await, json!({ "titles": ["One", "Two"] }));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_http_endpoint_reports_error_kinds() {
    let client = ScriptedClient::replying("1. Never Used");
    let app = test_app(client.clone(), fast_fetch_settings(1));

    let bad_url = app
        .clone()
        .oneshot(post_titles(json!({ "url": "ftp://example.com/file" })))
        .await
        .unwrap();
    assert_eq!(bad_url.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(bad_url).await["error"]["kind"], "InvalidUrl");

    let too_many = app
        .clone()
        .oneshot(post_titles(json!({ "url": "https://example.com", "numTitles": 50 })))
        .await
        .unwrap();
    assert_eq!(too_many.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(too_many).await["error"]["kind"], "InvalidRequest");

    let missing_url = app
        .oneshot(post_titles(json!({ "numTitles": 2 })))
        .await
        .unwrap();
    assert_eq!(missing_url.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(missing_url).await["error"]["kind"], "InvalidRequest");

    assert_eq!(client.calls(), 0);
}

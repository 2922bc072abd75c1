//! Router-level tests for the relay endpoints.
//!
//! The upstream provider is always a local `wiremock` server so that
//! results are deterministic.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use relay_api::create_router;
use relay_app::{AppContext, RelayConfig};
use relay_errors::{ErrorBody, ERROR_CODE_SENTINEL};
use serde_json::{json, Value};
use std::path::PathBuf;
use tower::ServiceExt;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

const ALLOWED_ORIGIN: &str = "https://game.example.com";

fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../app")
}

fn app_with(base_url: String, allowed_origin: Option<&str>) -> Router {
    let config = RelayConfig::default()
        .with_api_key(Some("sk-test".to_string()))
        .with_openai_base_url(base_url)
        .with_allowed_origin(allowed_origin.map(str::to_string))
        .with_static_dir(static_dir());
    create_router(AppContext::new(config))
}

fn app_with_base_url(base_url: String) -> Router {
    app_with(base_url, Some(ALLOWED_ORIGIN))
}

fn app_for(server: &MockServer) -> Router {
    app_with_base_url(server.uri())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_for_error(app: Router, request: Request<Body>) -> (StatusCode, ErrorBody) {
    let (status, bytes) = send(app, request).await;
    let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.error_code, ERROR_CODE_SENTINEL);
    (status, body)
}

fn conversation(content: &str) -> Value {
    json!({
        "Messages": [
            {"Role": "system", "Content": "You are a helpful innkeeper."},
            {"Role": "user", "Content": content}
        ],
        "SLlpProvider": "OpenAI",
        "Temperature": 0.7,
        "Model": "gpt-3.5-turbo",
        "SPlatformSentFrom": "Unity"
    })
}

fn reply(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

async fn mount_reply(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(content)))
        .expect(1)
        .mount(server)
        .await;
}

/// Replies with the last user message so concurrent responses can be told apart.
struct EchoReply;

impl Respond for EchoReply {
    fn respond(&self, request: &wiremock::Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let last = body["messages"]
            .as_array()
            .and_then(|messages| messages.last())
            .and_then(|m| m["content"].as_str())
            .unwrap_or_default()
            .to_string();
        ResponseTemplate::new(200).set_body_json(reply(&format!("echo: {last}")))
    }
}

// ---------------------------------------------------------------------------
// Conversation endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn completion_returns_upstream_json() {
    let server = MockServer::start().await;
    mount_reply(&server, "hi").await;

    let (status, bytes) = send(
        app_for(&server),
        post_json("/my-llp-endpoint/completions", conversation("hello")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, reply("hi"));
}

#[tokio::test]
async fn missing_messages_is_bad_request() {
    let server = MockServer::start().await;

    let (status, body) = send_for_error(
        app_for(&server),
        post_json(
            "/my-llp-endpoint/completions",
            json!({"SLlpProvider": "OpenAI", "Model": "gpt-3.5-turbo"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.error.contains("messages"));
}

#[tokio::test]
async fn invalid_role_or_content_is_bad_request() {
    let server = MockServer::start().await;

    for messages in [
        json!([{"Role": "", "Content": "hi"}]),
        json!([{"Role": "user", "Content": ""}]),
        json!([{"Role": "user", "Content": 12}]),
    ] {
        let (status, body) = send_for_error(
            app_for(&server),
            post_json(
                "/my-llp-endpoint/completions",
                json!({"Messages": messages, "SLlpProvider": "OpenAI", "Model": "m"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "invalid or missing role/content");
    }
}

#[tokio::test]
async fn unknown_provider_is_bad_request() {
    let server = MockServer::start().await;
    let mut request = conversation("hello");
    request["SLlpProvider"] = json!("Anthropic");

    let (status, body) = send_for_error(
        app_for(&server),
        post_json("/my-llp-endpoint/completions", request),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.error.contains("provider not recognised"));
}

#[tokio::test]
async fn missing_model_is_bad_request() {
    let server = MockServer::start().await;
    let mut request = conversation("hello");
    request.as_object_mut().unwrap().remove("Model");

    let (status, body) = send_for_error(
        app_for(&server),
        post_json("/my-llp-endpoint/completions", request),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error, "no model provided");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let server = MockServer::start().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/my-llp-endpoint/completions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send_for_error(app_for(&server), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.error.starts_with("malformed request body"));
}

#[tokio::test]
async fn upstream_rate_limit_is_reported_as_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Rate limit reached", "code": "rate_limit_exceeded"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send_for_error(
        app_for(&server),
        post_json("/my-llp-endpoint/completions", conversation("hello")),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.error.contains("429"));
    assert!(body.error.contains("rate_limit_exceeded"));
}

#[tokio::test]
async fn unreachable_upstream_is_reported_as_500() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let (status, body) = send_for_error(
        app_with_base_url(format!("http://127.0.0.1:{port}")),
        post_json("/my-llp-endpoint/completions", conversation("hello")),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.error.contains("upstream call failed"));
}

#[tokio::test]
async fn malformed_upstream_body_is_reported_as_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let (status, _) = send_for_error(
        app_for(&server),
        post_json("/my-llp-endpoint/completions", conversation("hello")),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn concurrent_requests_get_their_own_replies() {
    const REQUESTS: usize = 16;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(EchoReply)
        .expect(REQUESTS as u64)
        .mount(&server)
        .await;

    let app = app_for(&server);
    let handles: Vec<_> = (0..REQUESTS)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let content = format!("question #{i}");
                let (status, bytes) = send(
                    app,
                    post_json("/my-llp-endpoint/completions", conversation(&content)),
                )
                .await;
                (content, status, bytes)
            })
        })
        .collect();

    for handle in handles {
        let (content, status, bytes) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["choices"][0]["message"]["content"],
            format!("echo: {content}")
        );
    }
}

// ---------------------------------------------------------------------------
// Model listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn available_models_are_relayed_verbatim() {
    let server = MockServer::start().await;
    let models = json!({
        "object": "list",
        "data": [
            {"id": "gpt-4o", "object": "model", "owned_by": "system"},
            {"id": "gpt-3.5-turbo", "object": "model", "owned_by": "openai"}
        ]
    });
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(bearer_token("sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(models.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let (status, bytes) = send(app_for(&server), get("/my-llp-endpoint/available-models")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), models);
}

#[tokio::test]
async fn available_models_upstream_failure_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let (status, body) =
        send_for_error(app_for(&server), get("/my-llp-endpoint/available-models")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.error.contains("invalid api key"));
}

#[tokio::test]
async fn available_models_rejects_unknown_provider() {
    let server = MockServer::start().await;

    let (status, _) = send_for_error(
        app_for(&server),
        get("/my-llp-endpoint/available-models?provider=Cohere"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Single-message endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn message_endpoint_returns_plain_reply() {
    let server = MockServer::start().await;
    mount_reply(&server, "hi").await;

    let (status, bytes) = send(
        app_for(&server),
        post_json(
            "/my-gpt-endpoint",
            json!({"message": "hello", "sPlatformSentFrom": "WebGL"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap(), "hi");
}

#[tokio::test]
async fn message_endpoint_path_form() {
    let server = MockServer::start().await;
    mount_reply(&server, "hi there").await;

    let (status, bytes) = send(app_for(&server), get("/my-gpt-endpoint/hello")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap(), "hi there");
}

#[tokio::test]
async fn message_endpoint_path_rejection_uses_json_error() {
    let server = MockServer::start().await;

    let (status, body) = send_for_error(app_for(&server), get("/my-gpt-endpoint/%FF")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.error.starts_with("malformed request body"));
}

#[tokio::test]
async fn wrong_method_uses_json_error() {
    let server = MockServer::start().await;

    let (status, body) =
        send_for_error(app_for(&server), get("/my-llp-endpoint/completions")).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body.error.contains("GET /my-llp-endpoint/completions"));
}

#[tokio::test]
async fn message_endpoint_requires_message() {
    let server = MockServer::start().await;

    let (status, body) = send_for_error(
        app_for(&server),
        post_json("/my-gpt-endpoint", json!({"sPlatformSentFrom": "WebGL"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.error.contains("message"));
}

// ---------------------------------------------------------------------------
// Static files and CORS
// ---------------------------------------------------------------------------

#[tokio::test]
async fn landing_page_is_served() {
    let server = MockServer::start().await;

    let (status, bytes) = send(app_for(&server), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(bytes).unwrap().contains("chat-form"));
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/my-llp-endpoint/completions")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap()
}

async fn allowed_origin_header(app: Router, origin: &str) -> Option<String> {
    let response = app.oneshot(preflight(origin)).await.unwrap();
    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn preflight_allows_configured_origin_only() {
    let server = MockServer::start().await;

    assert_eq!(
        allowed_origin_header(app_for(&server), ALLOWED_ORIGIN).await,
        Some(ALLOWED_ORIGIN.to_string())
    );
    assert_eq!(
        allowed_origin_header(app_for(&server), "https://evil.example.com").await,
        None
    );
}

#[tokio::test]
async fn preflight_without_configured_origin_allows_nobody() {
    let server = MockServer::start().await;
    let app = app_with(server.uri(), None);

    assert_eq!(allowed_origin_header(app, ALLOWED_ORIGIN).await, None);
}

#[tokio::test]
async fn preflight_with_wildcard_origin_allows_anyone() {
    let server = MockServer::start().await;
    let app = app_with(server.uri(), Some("*"));

    assert_eq!(
        allowed_origin_header(app, "https://anywhere.example.com").await,
        Some("*".to_string())
    );
}

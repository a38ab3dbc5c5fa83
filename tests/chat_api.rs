//! End-to-end tests for the chat relay endpoint.
//!
//! Each test stands up the application router against a local mock
//! upstream bound to an ephemeral port, so no network access or real
//! credential is needed.

use std::sync::{Arc, Mutex};

use axum::{Json, Router, http::StatusCode, routing::post};
use axum_test::TestServer;
use serde_json::{Value, json};

use medici_chat::AppState;
use medici_chat::llm::{ChatCompletionsClient, LlmSettings};
use medici_chat::server::build_router;

/// Spawn a mock upstream that answers `/chat/completions` with a canned
/// status and body. Returns its base URL.
async fn spawn_upstream(status: StatusCode, body: Value) -> String {
    let app = Router::new().route(
        "/chat/completions",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );
    serve_ephemeral(app).await
}

/// Spawn a mock upstream that records the request body it receives and
/// answers 200 with the given body.
async fn spawn_capturing_upstream(reply_body: Value) -> (String, Arc<Mutex<Option<Value>>>) {
    let captured: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&captured);

    let app = Router::new().route(
        "/chat/completions",
        post(move |Json(req): Json<Value>| {
            let sink = Arc::clone(&sink);
            let body = reply_body.clone();
            async move {
                *sink.lock().unwrap() = Some(req);
                Json(body)
            }
        }),
    );

    (serve_ephemeral(app).await, captured)
}

async fn serve_ephemeral(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Application under test, pointed at the given upstream base URL.
fn app(base_url: String) -> Router {
    let settings = LlmSettings {
        base_url,
        api_key: Some("test-key".to_string()),
        model: "test/model".to_string(),
    };
    build_router(AppState {
        llm: Arc::new(ChatCompletionsClient::new(settings)),
    })
}

fn conversation() -> Value {
    json!({
        "messages": [
            {"role": "assistant", "content": "Greetings."},
            {"role": "user", "content": "Who are you?"}
        ]
    })
}

#[tokio::test]
async fn test_non_post_method_is_405_with_empty_body() {
    let server = TestServer::new(app("http://unused.invalid".to_string())).unwrap();

    let response = server.get("/api/chat").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.text(), "");
}

#[tokio::test]
async fn test_missing_messages_is_400_with_reply() {
    let server = TestServer::new(app("http://unused.invalid".to_string())).unwrap();

    let response = server.post("/api/chat").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(
        body["reply"].as_str().unwrap().contains("messages missing"),
        "reply should explain the problem: {body}"
    );
}

#[tokio::test]
async fn test_non_array_messages_is_400_with_reply() {
    let server = TestServer::new(app("http://unused.invalid".to_string())).unwrap();

    let response = server
        .post("/api/chat")
        .json(&json!({"messages": "Who are you?"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["reply"].as_str().unwrap().contains("messages missing"));
}

#[tokio::test]
async fn test_non_json_body_is_400_with_reply() {
    let server = TestServer::new(app("http://unused.invalid".to_string())).unwrap();

    let response = server.post("/api/chat").text("not json").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["reply"].is_string());
}

#[tokio::test]
async fn test_malformed_message_entries_is_400_with_reply() {
    let server = TestServer::new(app("http://unused.invalid".to_string())).unwrap();

    let response = server
        .post("/api/chat")
        .json(&json!({"messages": [{"role": "emperor", "content": 7}]}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["reply"].as_str().unwrap().contains("malformed"));
}

#[tokio::test]
async fn test_chat_completion_shape_yields_exact_nested_content() {
    let upstream = spawn_upstream(
        StatusCode::OK,
        json!({
            "choices": [{"message": {"role": "assistant", "content": "I am Lorenzo, patron of Florence."}}]
        }),
    )
    .await;
    let server = TestServer::new(app(upstream)).unwrap();

    let response = server.post("/api/chat").json(&conversation()).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["reply"], "I am Lorenzo, patron of Florence.");
}

#[tokio::test]
async fn test_upstream_failure_maps_to_502_embedding_error_message() {
    let upstream = spawn_upstream(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": {"message": "model melted down"}}),
    )
    .await;
    let server = TestServer::new(app(upstream)).unwrap();

    let response = server.post("/api/chat").json(&conversation()).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(
        body["reply"].as_str().unwrap().contains("model melted down"),
        "reply should embed the upstream message: {body}"
    );
}

#[tokio::test]
async fn test_upstream_failure_without_message_gets_generic_502_reply() {
    let upstream = spawn_upstream(StatusCode::TOO_MANY_REQUESTS, json!({"retry_in": 30})).await;
    let server = TestServer::new(app(upstream)).unwrap();

    let response = server.post("/api/chat").json(&conversation()).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body["reply"].as_str().unwrap().contains("unknown error"));
}

#[tokio::test]
async fn test_unknown_response_shape_falls_back_to_serialized_body() {
    let raw = json!({"usage": {"total_tokens": 9}});
    let upstream = spawn_upstream(StatusCode::OK, raw.clone()).await;
    let server = TestServer::new(app(upstream)).unwrap();

    let response = server.post("/api/chat").json(&conversation()).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["reply"], raw.to_string());
}

#[tokio::test]
async fn test_unreachable_upstream_maps_to_500_with_generic_reply() {
    // Nothing listens on port 1.
    let server = TestServer::new(app("http://127.0.0.1:1".to_string())).unwrap();

    let response = server.post("/api/chat").json(&conversation()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["reply"], "Something went wrong on the server.");
}

#[tokio::test]
async fn test_outbound_body_carries_model_and_full_history() {
    let (upstream, captured) = spawn_capturing_upstream(json!({
        "choices": [{"message": {"content": "noted"}}]
    }))
    .await;
    let server = TestServer::new(app(upstream)).unwrap();

    let response = server
        .post("/api/chat")
        .json(&json!({
            "messages": [
                {"role": "assistant", "content": "Greetings."},
                {"role": "user", "content": "Who are you?"},
                {"role": "assistant", "content": "Lorenzo."}
            ]
        }))
        .await;
    response.assert_status_ok();

    let sent = captured.lock().unwrap().clone().expect("upstream was called");
    assert_eq!(sent["model"], "test/model");
    let forwarded = sent["messages"].as_array().expect("messages forwarded");
    assert_eq!(forwarded.len(), 3);
    assert_eq!(forwarded[1]["role"], "user");
    assert_eq!(forwarded[1]["content"], "Who are you?");
}

#[tokio::test]
async fn test_index_page_serves_persona_chat() {
    let server = TestServer::new(app("http://unused.invalid".to_string())).unwrap();

    let response = server.get("/").await;

    response.assert_status_ok();
    let page = response.text();
    assert!(page.contains("Lorenzo de' Medici"));
    assert!(page.contains("/api/chat"));
}

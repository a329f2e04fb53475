//! End-to-end tests for `HttpAgentClient` against a local SSE server.
//!
//! Each test binds an axum app on an ephemeral port that plays back a fixed
//! SSE body, then runs a full invocation through `cr_agent::invoke`.

use std::sync::{Arc, Mutex};

use axum::extract::{Json, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;

use cr_agent::{invoke, HttpAgentClient};
use cr_domain::config::AgentConfig;
use cr_domain::error::Error;

#[derive(Clone)]
struct Backend {
    status: StatusCode,
    body: &'static str,
    seen: Arc<Mutex<Vec<(Vec<String>, serde_json::Value, Option<String>)>>>,
}

async fn invoke_handler(
    State(backend): State<Backend>,
    Path((agent, alias, session)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    backend
        .seen
        .lock()
        .unwrap()
        .push((vec![agent, alias, session], body, auth));
    (
        backend.status,
        [(header::CONTENT_TYPE, "text/event-stream")],
        backend.body,
    )
}

async fn spawn_backend(status: StatusCode, body: &'static str) -> (String, Backend) {
    let backend = Backend {
        status,
        body,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route(
            "/agents/:agent/agentAliases/:alias/sessions/:session/text",
            post(invoke_handler),
        )
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), backend)
}

fn client(base_url: String, api_key: Option<&str>) -> HttpAgentClient {
    let cfg = AgentConfig {
        base_url,
        ..AgentConfig::default()
    };
    HttpAgentClient::with_api_key(&cfg, api_key.map(str::to_owned)).unwrap()
}

#[tokio::test]
async fn streams_chunks_and_keeps_the_last() {
    let body = "data: {\"trace\":{\"orchestration\":\"planning\"}}\n\n\
                data: {\"chunk\":{\"bytes\":\"SGVsbG8g\"}}\n\n\
                data: {\"chunk\":{\"bytes\":\"d29ybGQ=\"}}\n\n";
    let (url, backend) = spawn_backend(StatusCode::OK, body).await;

    let answer = invoke(&client(url, Some("secret")), "AGT", "ALIAS", "sess-9", "Hello")
        .await
        .unwrap();
    assert_eq!(answer.as_deref(), Some("world"));

    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, vec!["AGT", "ALIAS", "sess-9"]);
    assert_eq!(seen[0].1, serde_json::json!({ "inputText": "Hello" }));
    assert_eq!(seen[0].2.as_deref(), Some("Bearer secret"));
}

#[tokio::test]
async fn trailing_event_without_terminator_is_flushed() {
    let body = "data: {\"chunk\":{\"bytes\":\"SSBhbSBmaW5l\"}}";
    let (url, _backend) = spawn_backend(StatusCode::OK, body).await;

    let answer = invoke(&client(url, None), "a", "b", "s", "p").await.unwrap();
    assert_eq!(answer.as_deref(), Some("I am fine"));
}

#[tokio::test]
async fn unknown_event_shape_fails_the_invocation() {
    let body = "data: {\"returnControl\":{\"invocationId\":\"x\"}}\n\n";
    let (url, _backend) = spawn_backend(StatusCode::OK, body).await;

    let err = invoke(&client(url, None), "a", "b", "s", "p").await.unwrap_err();
    assert!(matches!(err, Error::UnexpectedAgentEvent(_)));
}

#[tokio::test]
async fn empty_stream_has_no_answer() {
    let (url, _backend) = spawn_backend(StatusCode::OK, "").await;

    let answer = invoke(&client(url, None), "a", "b", "s", "p").await.unwrap();
    assert!(answer.is_none());
}

#[tokio::test]
async fn error_status_is_unavailable() {
    let (url, _backend) = spawn_backend(StatusCode::NOT_FOUND, "no such agent").await;

    let err = invoke(&client(url, None), "", "", "s", "p").await.unwrap_err();
    match err {
        Error::AgentUnavailable(msg) => assert!(msg.contains("404")),
        other => panic!("expected AgentUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = invoke(&client(format!("http://{addr}"), None), "a", "b", "s", "p")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AgentUnavailable(_)));
}

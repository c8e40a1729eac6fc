use chat_widget::config::WidgetConfig;
use chat_widget::error::ClientError;
use chat_widget::message::{ChatRequest, Command};
use chat_widget::services::chat_client::{ChatBackend, HttpChatClient};
use chat_widget::services::input_handler::{ChatInputHandler, SendOutcome};
use chat_widget::services::transcript::Transcript;
use chat_widget::surface::{Alert, InputField, InputSource, Surface};

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    routing::post,
};
use reqwest::Url;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

async fn serve(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/response")).unwrap()
}

/// Mimics the chat service: echoes turns, scores `end chat`.
async fn stub_service(Json(req): Json<ChatRequest>) -> Json<Value> {
    match Command::parse(&req.query) {
        Command::EndChat => Json(json!({
            "response": "Chat ended. Here is your evaluation score and feedback.",
            "score": 8,
            "feedback": "You asked about pain location and history."
        })),
        Command::Message => Json(json!({ "response": format!("patient heard: {}", req.query) })),
    }
}

#[tokio::test]
async fn posts_query_as_json() {
    let app = Router::new().route(
        "/response",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let content_type = headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Json(json!({ "response": format!("{content_type} {body}") }))
        }),
    );
    let client = HttpChatClient::new(serve(app).await, None).unwrap();

    let reply = client.send_query("  Hello doctor ").await.unwrap();

    assert_eq!(
        reply.response_text().as_deref(),
        Some(r#"application/json {"query":"  Hello doctor "}"#)
    );
}

#[tokio::test]
async fn error_status_with_json_body_is_still_a_reply() {
    let app = Router::new().route(
        "/response",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An internal server error occurred." })),
            )
        }),
    );
    let client = HttpChatClient::new(serve(app).await, None).unwrap();

    let reply = client.send_query("hi").await.unwrap();

    assert!(reply.response.is_none());
    assert_eq!(
        reply.error.map(|e| e.to_string()).as_deref(),
        Some("An internal server error occurred.")
    );
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let app = Router::new().route("/response", post(|| async { "<h1>Bad Gateway</h1>" }));
    let client = HttpChatClient::new(serve(app).await, None).unwrap();

    let err = client.send_query("hi").await.unwrap_err();

    assert!(matches!(err, ClientError::MalformedReply(_)), "got {err:?}");
}

#[tokio::test]
async fn refused_connection_is_connect_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let url = Url::parse(&format!("http://{addr}/response")).unwrap();
    let client = HttpChatClient::new(url, None).unwrap();

    let err = client.send_query("hi").await.unwrap_err();

    assert!(matches!(err, ClientError::Connect(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_reply_times_out_when_configured() {
    let app = Router::new().route(
        "/response",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "response": "too late" }))
        }),
    );
    let mut config = WidgetConfig::new(serve(app).await);
    config.timeout = Some(Duration::from_millis(100));
    let client = HttpChatClient::from_config(&config).unwrap();

    let err = client.send_query("hi").await.unwrap_err();

    assert!(matches!(err, ClientError::Timeout(_)), "got {err:?}");
}

struct Quiet;

impl Alert for Quiet {
    fn alert(&self, _message: &str) {}
}

#[tokio::test]
async fn full_session_against_stub_service() {
    let app = Router::new().route("/response", post(stub_service));
    let client = HttpChatClient::new(serve(app).await, None).unwrap();

    let input = InputField::new();
    let transcript = Transcript::new();
    let surface = Surface::new(
        Arc::new(input.clone()),
        Arc::new(transcript.clone()),
        Arc::new(transcript.clone()),
        Arc::new(Quiet),
    );
    let handler = ChatInputHandler::new(client, surface);

    input.set("Where does it hurt?");
    assert_eq!(handler.send_message().await, SendOutcome::Replied);
    input.set("End Chat");
    assert_eq!(handler.send_message().await, SendOutcome::Evaluated);

    assert_eq!(
        transcript.texts(),
        vec![
            "You: Where does it hurt?",
            "Bot: patient heard: Where does it hurt?",
            "You: End Chat",
            "Chat ended. Here is your evaluation:",
            "⭐ Score: 8/10",
            "📌 Feedback: You asked about pain location and history.",
        ]
    );
    assert_eq!(input.value(), "");
    assert!(transcript.is_scrolled_to_bottom());
}

#[tokio::test]
async fn unreachable_service_renders_connection_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let url = Url::parse(&format!("http://{addr}/response")).unwrap();

    let input = InputField::new();
    let transcript = Transcript::new();
    let surface = Surface::new(
        Arc::new(input.clone()),
        Arc::new(transcript.clone()),
        Arc::new(transcript.clone()),
        Arc::new(Quiet),
    );
    let handler = ChatInputHandler::new(HttpChatClient::new(url, None).unwrap(), surface);

    input.set("hello?");
    assert_eq!(handler.send_message().await, SendOutcome::ConnectionFailed);
    assert_eq!(
        transcript.texts(),
        vec!["You: hello?", "Error: Unable to connect to the server."]
    );
    assert_eq!(input.value(), "");
}

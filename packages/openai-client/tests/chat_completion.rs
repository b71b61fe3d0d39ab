//! Chat completion behaviour against a local mock server.

use std::time::Duration;

use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> ChatRequest {
    ChatRequest::new("gpt-4o-mini")
        .message(Message::user("Summarize this"))
        .token_budget(128)
}

#[tokio::test]
async fn test_chat_completion_returns_content_and_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [{"message": {"role": "assistant", "content": "{\"ok\":true}"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 40, "completion_tokens": 12, "total_tokens": 52}
        })))
        .mount(&server)
        .await;

    let client = OpenAIClient::new("sk-test").with_base_url(server.uri());
    let response = client.chat_completion(request()).await.unwrap();

    assert_eq!(response.content, "{\"ok\":true}");
    assert_eq!(response.total_tokens(), 52);
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
}

#[tokio::test]
async fn test_api_error_carries_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided"}
        })))
        .mount(&server)
        .await;

    let client = OpenAIClient::new("sk-bad").with_base_url(server.uri());
    let err = client.chat_completion(request()).await.unwrap_err();

    assert!(err.is_auth());
    match err {
        OpenAIError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_response_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = OpenAIClient::new("sk-test")
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(200));
    let err = client.chat_completion(request()).await.unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn test_missing_choices_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = OpenAIClient::new("sk-test").with_base_url(server.uri());
    let err = client.chat_completion(request()).await.unwrap_err();

    assert!(matches!(err, OpenAIError::Parse(_)));
}

//! Tests for the OpenAI-compatible provider (Groq and OpenAI presets)

use mockito::Matcher;
use payo_providers::{
    classify, ChatRequest, FailureKind, FinishReason, GenerationRequest, OpenAiCompatibleProvider,
    Provider, ProviderError,
};
use serde_json::json;

fn groq_against(base_url: String) -> OpenAiCompatibleProvider {
    OpenAiCompatibleProvider::groq("gsk_test_key".to_string())
        .unwrap()
        .with_base_url(base_url)
}

fn text_request() -> ChatRequest {
    GenerationRequest::text("Kumusta?").to_chat_request("llama-3.3-70b-versatile")
}

#[test]
fn test_presets() {
    let groq = OpenAiCompatibleProvider::groq("gsk_key".to_string()).unwrap();
    assert_eq!(groq.id(), "groq");
    assert_eq!(groq.name(), "Groq");
    assert_eq!(groq.model(), "llama-3.3-70b-versatile");

    let openai = OpenAiCompatibleProvider::openai("sk-key".to_string()).unwrap();
    assert_eq!(openai.id(), "openai");
    assert_eq!(openai.model(), "gpt-4o-mini");
}

#[test]
fn test_empty_api_key_rejected() {
    let result = OpenAiCompatibleProvider::groq("  ".to_string());
    match result {
        Err(ProviderError::ConfigError(message)) => assert!(message.contains("Groq")),
        _ => panic!("Expected ConfigError for a blank key"),
    }
}

#[tokio::test]
async fn test_chat_completion_with_mock() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer gsk_test_key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
            "model": "llama-3.3-70b-versatile",
            "choices": [
                {
                    "message": {"role": "assistant", "content": "Magandang araw po!"},
                    "finish_reason": "stop"
                }
            ],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
        }"#,
        )
        .create_async()
        .await;

    let provider = groq_against(server.url());
    let response = provider.chat(text_request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.content, "Magandang araw po!");
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert_eq!(response.usage.total_tokens, 17);
}

#[tokio::test]
async fn test_json_mode_requests_json_object() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "response_format": {"type": "json_object"},
            "max_tokens": 2048
        })))
        .with_status(200)
        .with_body(r#"{"choices": [{"message": {"content": "{\"situation\": \"x\"}"}}]}"#)
        .create_async()
        .await;

    let provider = groq_against(server.url());
    let request = GenerationRequest::json("summarise").to_chat_request(provider.model());
    let response = provider.chat(request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.content, r#"{"situation": "x"}"#);
    // Missing model in the body falls back to the requested one
    assert_eq!(response.model, "llama-3.3-70b-versatile");
}

#[tokio::test]
async fn test_quota_error_is_classified_as_quota() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body(
            r#"{"error": {"message": "You exceeded your current quota", "type": "insufficient_quota", "code": "insufficient_quota"}}"#,
        )
        .create_async()
        .await;

    let provider = groq_against(server.url());
    let err = provider.chat(text_request()).await.unwrap_err();

    assert_eq!(
        err,
        ProviderError::ApiError {
            status: 429,
            code: Some("insufficient_quota".to_string()),
            message: "You exceeded your current quota".to_string(),
        }
    );
    assert_eq!(classify(&err), FailureKind::Quota);
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream connect error")
        .create_async()
        .await;

    let provider = groq_against(server.url());
    let err = provider.chat(text_request()).await.unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.to_string(), "API error (500): Groq API error");
    assert_eq!(classify(&err), FailureKind::Transient);
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": {"message": "Invalid API Key"}}"#)
        .create_async()
        .await;

    let provider = groq_against(server.url());
    let err = provider.chat(text_request()).await.unwrap_err();
    assert_eq!(err, ProviderError::AuthError);
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body("not json at all")
        .create_async()
        .await;

    let provider = groq_against(server.url());
    assert!(provider.chat(text_request()).await.is_err());
}

#[tokio::test]
async fn test_health_check_with_mock() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/models")
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .create_async()
        .await;

    let provider = groq_against(server.url());
    assert_eq!(provider.health_check().await, Ok(true));
}

#[tokio::test]
async fn test_health_check_failure_with_mock() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/models")
        .with_status(503)
        .create_async()
        .await;

    let provider = groq_against(server.url());
    assert_eq!(provider.health_check().await, Ok(false));
}

//! OpenAI-compatible chat-completions provider
//!
//! Groq and OpenAI both speak the `/chat/completions` wire format, so one
//! client covers them; presets only differ in key, base URL and model.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::ProviderError;
use crate::models::{ChatRequest, ChatResponse, FinishReason, TokenUsage};
use crate::provider::Provider;

/// Groq endpoint
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Default Groq model
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
/// OpenAI endpoint
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Default OpenAI model
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Provider for any OpenAI-compatible chat-completions API
pub struct OpenAiCompatibleProvider {
    id: String,
    name: String,
    api_key: String,
    client: Arc<Client>,
    base_url: String,
    model: String,
}

impl OpenAiCompatibleProvider {
    /// Create a provider with an explicit identity, endpoint and model
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        api_key: String,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let name = name.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::ConfigError(format!(
                "{} API key is required",
                name
            )));
        }

        Ok(Self {
            id: id.into(),
            name,
            api_key,
            client: Arc::new(Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Groq preset
    pub fn groq(api_key: String) -> Result<Self, ProviderError> {
        Self::new("groq", "Groq", api_key, GROQ_BASE_URL, GROQ_DEFAULT_MODEL)
    }

    /// OpenAI preset
    pub fn openai(api_key: String) -> Result<Self, ProviderError> {
        Self::new("openai", "OpenAI", api_key, OPENAI_BASE_URL, OPENAI_DEFAULT_MODEL)
    }

    /// Use a custom base URL (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Share an HTTP client
    pub fn with_client(mut self, client: Arc<Client>) -> Self {
        self.client = client;
        self
    }

    fn get_auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Convert an API response to our ChatResponse
    fn convert_response(response: ApiChatResponse, model: String) -> ChatResponse {
        let choice = response.choices.into_iter().next();
        let finish_reason = match choice.as_ref().and_then(|c| c.finish_reason.as_deref()) {
            Some("length") => FinishReason::Length,
            Some("error") => FinishReason::Error,
            _ => FinishReason::Stop,
        };
        let content = choice
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();
        let usage = response.usage.unwrap_or_default();

        ChatResponse {
            content,
            model: response.model.unwrap_or(model),
            usage: TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
            finish_reason,
        }
    }
}

/// Build a ProviderError from a non-success status and body
pub(crate) fn api_error(provider: &str, status: u16, body: &str) -> ProviderError {
    if status == 401 {
        return ProviderError::AuthError;
    }

    let envelope = serde_json::from_str::<ApiErrorEnvelope>(body).ok();
    let detail = envelope.map(|e| e.error);
    let code = detail.as_ref().and_then(|d| {
        d.code
            .as_ref()
            .map(|c| c.as_str().map(str::to_string).unwrap_or_else(|| c.to_string()))
            .or_else(|| d.error_type.clone())
    });
    let message = detail
        .and_then(|d| d.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("{} API error", provider));

    ProviderError::ApiError {
        status,
        code,
        message,
    }
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let api_request = ApiChatRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.clone(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_mode.then(|| ResponseFormat {
                format_type: "json_object",
            }),
        };

        debug!(
            "Sending chat request to {} for model: {}",
            self.name, request.model
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", self.get_auth_header())
            .header("Content-Type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| {
                error!("{} API request failed: {}", self.name, e);
                ProviderError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("{} API error ({})", self.name, status);
            return Err(api_error(&self.name, status.as_u16(), &error_text));
        }

        let api_response: ApiChatResponse = response.json().await?;
        Ok(Self::convert_response(api_response, request.model))
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        debug!("Performing health check for {} provider", self.name);

        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .header("Authorization", self.get_auth_header())
            .send()
            .await
            .map_err(|e| {
                warn!("{} health check failed: {}", self.name, e);
                ProviderError::from(e)
            })?;

        match response.status().as_u16() {
            200 => {
                debug!("{} health check passed", self.name);
                Ok(true)
            }
            401 => {
                error!("{} health check failed: authentication error", self.name);
                Err(ProviderError::AuthError)
            }
            other => {
                warn!("{} health check failed with status: {}", self.name, other);
                Ok(false)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiChatRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: Option<ApiResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
    #[serde(default)]
    total_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_preset() {
        let provider = OpenAiCompatibleProvider::groq("gsk_test".to_string()).unwrap();
        assert_eq!(provider.id(), "groq");
        assert_eq!(provider.name(), "Groq");
        assert_eq!(provider.model(), GROQ_DEFAULT_MODEL);
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(OpenAiCompatibleProvider::openai("  ".to_string()).is_err());
    }

    #[test]
    fn test_api_error_reads_envelope() {
        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":"insufficient_quota"}}"#;
        let err = api_error("OpenAI", 429, body);
        assert_eq!(
            err,
            ProviderError::ApiError {
                status: 429,
                code: Some("insufficient_quota".to_string()),
                message: "You exceeded your current quota".to_string(),
            }
        );
    }

    #[test]
    fn test_api_error_without_body() {
        let err = api_error("Groq", 503, "<html>bad gateway</html>");
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.error_code(), None);
        assert_eq!(err.to_string(), "API error (503): Groq API error");
    }

    #[test]
    fn test_unauthorized_maps_to_auth_error() {
        assert_eq!(api_error("Groq", 401, "{}"), ProviderError::AuthError);
    }
}

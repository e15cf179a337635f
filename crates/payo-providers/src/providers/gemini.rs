//! Google Gemini provider implementation

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::openai_compatible::api_error;
use crate::error::ProviderError;
use crate::models::{ChatRequest, ChatResponse, FinishReason, TokenUsage};
use crate::provider::Provider;

/// Gemini endpoint
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Default Gemini model
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Google Gemini provider implementation
pub struct GeminiProvider {
    api_key: String,
    client: Arc<Client>,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::ConfigError(
                "Gemini API key is required".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            client: Arc::new(Client::new()),
            base_url: GEMINI_BASE_URL.to_string(),
            model: GEMINI_DEFAULT_MODEL.to_string(),
        })
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

    fn build_request(request: &ChatRequest) -> GeminiChatRequest {
        let system: Vec<GeminiPart> = request
            .messages
            .iter()
            .filter(|m| m.role == "system")
            .map(|m| GeminiPart {
                text: m.content.clone(),
            })
            .collect();
        let contents = request
            .messages
            .iter()
            .filter(|m| m.role != "system")
            .map(|m| GeminiContent {
                role: if m.role == "assistant" {
                    "model".to_string()
                } else {
                    "user".to_string()
                },
                parts: vec![GeminiPart {
                    text: m.content.clone(),
                }],
            })
            .collect();

        GeminiChatRequest {
            contents,
            system_instruction: (!system.is_empty()).then(|| GeminiSystemInstruction { parts: system }),
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: request.json_mode.then_some("application/json"),
            },
        }
    }

    fn convert_response(response: GeminiChatResponse, model: String) -> ChatResponse {
        let candidate = response.candidates.into_iter().next();
        let finish_reason = match candidate.as_ref().and_then(|c| c.finish_reason.as_deref()) {
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") | Some("RECITATION") | Some("OTHER") => FinishReason::Error,
            _ => FinishReason::Stop,
        };
        let content = candidate
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        let usage = response
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        ChatResponse {
            content,
            model,
            usage,
            finish_reason,
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn id(&self) -> &str {
        "gemini"
    }

    fn name(&self) -> &str {
        "Google Gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let gemini_request = Self::build_request(&request);

        debug!(
            "Sending chat request to Gemini for model: {}",
            request.model
        );

        let url = format!("{}/{}:generateContent", self.base_url, request.model);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("Gemini API request failed: {}", e);
                ProviderError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error ({})", status);

            return match status.as_u16() {
                403 => Err(ProviderError::AuthError),
                code => Err(api_error("Gemini", code, &error_text)),
            };
        }

        let gemini_response: GeminiChatResponse = response.json().await?;
        Ok(Self::convert_response(gemini_response, request.model))
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        debug!("Performing health check for Gemini provider");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                warn!("Gemini health check failed: {}", e);
                ProviderError::from(e)
            })?;

        match response.status().as_u16() {
            200 => {
                debug!("Gemini health check passed");
                Ok(true)
            }
            401 | 403 => {
                error!("Gemini health check failed: authentication error");
                Err(ProviderError::AuthError)
            }
            other => {
                warn!("Gemini health check failed with status: {}", other);
                Ok(false)
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiChatRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiChatResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
    #[serde(default)]
    total_token_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Message;

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new("test-key".to_string()).unwrap();
        assert_eq!(provider.id(), "gemini");
        assert_eq!(provider.model(), GEMINI_DEFAULT_MODEL);
        assert!(GeminiProvider::new(String::new()).is_err());
    }

    #[test]
    fn test_system_messages_become_instruction() {
        let request = ChatRequest {
            model: GEMINI_DEFAULT_MODEL.to_string(),
            messages: vec![Message::system("be kind"), Message::user("hello")],
            temperature: Some(0.3),
            max_tokens: Some(100),
            json_mode: true,
        };
        let body = serde_json::to_value(GeminiProvider::build_request(&request)).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be kind");
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 100);
    }
}

//! Data models for providers

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message role (user, assistant, system)
    pub role: String,
    /// Message content
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request sent to a single provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model to use
    pub model: String,
    /// Messages in the conversation
    pub messages: Vec<Message>,
    /// Temperature for sampling (0.0 to 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<usize>,
    /// Ask the provider for a JSON object response when it supports it
    #[serde(default)]
    pub json_mode: bool,
}

/// Reason for chat completion finish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    /// Model finished normally
    Stop,
    /// Maximum tokens reached
    Length,
    /// Model encountered an error
    Error,
}

/// Token usage information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used
    pub total_tokens: usize,
}

/// Chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated content
    pub content: String,
    /// Model used
    pub model: String,
    /// Token usage
    pub usage: TokenUsage,
    /// Reason for completion
    pub finish_reason: FinishReason,
}

/// Output contract for a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Short free-form text; empty output counts as a failure
    Text,
    /// A JSON object, repaired by the caller
    Json,
}

/// Provider-agnostic generation request handed to the failover loop
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Optional system instruction
    pub system: Option<String>,
    /// User prompt
    pub prompt: String,
    /// Expected output shape
    pub mode: OutputMode,
    /// Sampling temperature
    pub temperature: f32,
    /// Output size limit in tokens
    pub max_tokens: usize,
}

impl GenerationRequest {
    /// Create a text-mode request with conversational defaults
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            mode: OutputMode::Text,
            temperature: 0.7,
            max_tokens: 300,
        }
    }

    /// Create a JSON-mode request with structured-output defaults
    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            mode: OutputMode::Json,
            temperature: 0.3,
            max_tokens: 2048,
        }
    }

    /// Set the system instruction
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output size limit
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the provider-level chat request for `model`
    pub fn to_chat_request(&self, model: &str) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system {
            messages.push(Message::system(system.clone()));
        }
        messages.push(Message::user(self.prompt.clone()));

        ChatRequest {
            model: model.to_string(),
            messages,
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            json_mode: self.mode == OutputMode::Json,
        }
    }
}

/// Successful generation returned by the failover loop
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Key of the provider that answered
    pub provider_id: String,
    /// Model that answered
    pub model: String,
    /// Raw generated content
    pub content: String,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayoConfig {
    /// Per-provider settings keyed by provider key
    #[serde(default)]
    pub providers: HashMap<String, ProviderSettings>,
    /// Cooldown durations applied after failures
    #[serde(default)]
    pub cooldowns: CooldownSettings,
    /// Per-provider request timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Settings for a specific provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Force the provider on or off regardless of credentials
    #[serde(default)]
    pub enabled: Option<bool>,
    /// API key (can be overridden by environment variable)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL for the provider (for self-hosted or proxy)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model to request
    #[serde(default)]
    pub model: Option<String>,
    /// Selection priority, lower is tried first
    #[serde(default)]
    pub priority: Option<u32>,
    /// Human-readable name
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Cooldown durations in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CooldownSettings {
    /// Cooldown after a quota/balance failure
    #[serde(default)]
    pub quota_cooldown_ms: Option<u64>,
    /// Cooldown after any other failure
    #[serde(default)]
    pub transient_cooldown_ms: Option<u64>,
}

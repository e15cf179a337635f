//! Payo AI Providers - prioritised provider registry with failover
//!
//! This crate holds everything needed to get text out of hosted language
//! models without caring which one answers:
//! - [`provider::ProviderRegistry`] keeps the prioritised provider list and cooldowns
//! - [`provider::ProviderManager`] walks the registry and fails over between providers
//! - [`classification`] decides how long a failing provider sits out
//! - [`extraction`] recovers JSON objects from free-form model output
//! - [`config`] loads provider credentials and tuning from YAML and the environment

pub mod classification;
pub mod config;
pub mod error;
pub mod extraction;
pub mod models;
pub mod provider;
pub mod providers;
pub mod redaction;

// Re-export commonly used types
pub use classification::{classify, CooldownPolicy, FailureKind};
pub use config::ConfigurationManager;
pub use error::{OrchestratorError, ProviderError};
pub use extraction::extract_json;
pub use models::{
    ChatRequest, ChatResponse, FinishReason, Generation, GenerationRequest, Message, OutputMode,
    PayoConfig, ProviderSettings, TokenUsage,
};
pub use provider::{
    registry::{ProviderEntry, ProviderStatus},
    Provider, ProviderManager, ProviderRegistry,
};
pub use providers::{GeminiProvider, OpenAiCompatibleProvider};
pub use redaction::{redact, RedactionFilter};

//! Provider trait, registry and failover manager

use async_trait::async_trait;

use crate::{
    error::ProviderError,
    models::{ChatRequest, ChatResponse},
};

pub mod manager;
pub mod registry;

pub use manager::ProviderManager;
pub use registry::ProviderRegistry;

/// Core trait that all providers must implement
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider's unique identifier
    fn id(&self) -> &str;

    /// Get the provider's human-readable name
    fn name(&self) -> &str;

    /// Model requested when generating through this provider
    fn model(&self) -> &str;

    /// Send a single-turn chat completion request
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// Check if the provider is reachable and accepts our credentials
    async fn health_check(&self) -> Result<bool, ProviderError>;
}

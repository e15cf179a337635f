//! Failover manager over the provider registry
//!
//! Providers are tried one at a time in priority order. A failing provider is
//! recorded, classified and put in cooldown, then the next one is tried. Only
//! running out of providers is reported to the caller.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::{Provider, ProviderRegistry};
use crate::classification::{classify, CooldownPolicy};
use crate::error::{OrchestratorError, ProviderError};
use crate::models::{Generation, GenerationRequest, OutputMode};
use crate::provider::registry::ProviderStatus;
use crate::redaction::redact;

/// Central coordinator for provider operations
pub struct ProviderManager {
    registry: Arc<ProviderRegistry>,
    timeout: Duration,
    cooldowns: CooldownPolicy,
}

impl ProviderManager {
    /// Create a new provider manager over a shared registry
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            timeout: Duration::from_secs(30),
            cooldowns: CooldownPolicy::default(),
        }
    }

    /// Set the per-provider request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the cooldown policy
    pub fn with_cooldowns(mut self, cooldowns: CooldownPolicy) -> Self {
        self.cooldowns = cooldowns;
        self
    }

    /// Get the registry
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Generate with the highest-priority provider that succeeds
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Generation, OrchestratorError> {
        let candidates = self.registry.list_available();
        if candidates.is_empty() {
            return Err(self.nothing_to_try());
        }

        let mut errors = BTreeMap::new();
        for key in candidates {
            let Some(provider) = self.registry.client(&key) else {
                // Unregistered between listing and use
                continue;
            };

            match self.attempt(&provider, request).await {
                Ok(generation) => {
                    info!("Generated response with provider {}", key);
                    return Ok(generation);
                }
                Err(err) => {
                    let message = redact(&err.to_string());
                    let kind = classify(&err);
                    let cooldown = self.cooldowns.cooldown_for(kind);
                    warn!(
                        "Provider {} failed ({} failure, cooling down {} ms): {}",
                        key,
                        kind,
                        cooldown.as_millis(),
                        message
                    );
                    self.registry.record_error(&key, message.clone());
                    if let Err(e) = self.registry.mark_unavailable(&key, cooldown) {
                        debug!("Could not mark {} unavailable: {}", key, e);
                    }
                    errors.insert(key, message);
                }
            }
        }

        Err(OrchestratorError::AllProvidersExhausted { errors })
    }

    async fn attempt(
        &self,
        provider: &Arc<dyn Provider>,
        request: &GenerationRequest,
    ) -> Result<Generation, ProviderError> {
        let chat_request = request.to_chat_request(provider.model());
        debug!(
            "Sending {:?} request to {} ({})",
            request.mode,
            provider.id(),
            provider.model()
        );

        let response = match tokio::time::timeout(self.timeout, provider.chat(chat_request)).await
        {
            Ok(result) => result?,
            Err(_) => return Err(ProviderError::Timeout(self.timeout.as_millis() as u64)),
        };

        if request.mode == OutputMode::Text && response.content.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(Generation {
            provider_id: provider.id().to_string(),
            model: response.model,
            content: response.content,
        })
    }

    /// Error for a call that found no provider to try
    fn nothing_to_try(&self) -> OrchestratorError {
        let enabled = self.registry.enabled_keys();
        if enabled.is_empty() {
            return OrchestratorError::NoProvidersAvailable;
        }

        let last_errors = self.registry.last_errors();
        let errors = enabled
            .into_iter()
            .map(|key| {
                let message = last_errors
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| "cooling down".to_string());
                (key, message)
            })
            .collect();
        OrchestratorError::AllProvidersExhausted { errors }
    }

    /// Diagnostic snapshot of every provider
    pub fn provider_status(&self) -> Vec<ProviderStatus> {
        self.registry.status()
    }

    /// Check health of every configured provider
    ///
    /// Purely diagnostic: results do not affect cooldowns.
    pub async fn health_check_all(&self) -> Vec<(String, Result<bool, ProviderError>)> {
        let providers: Vec<Arc<dyn Provider>> = self
            .registry
            .status()
            .into_iter()
            .filter_map(|row| self.registry.client(&row.key))
            .collect();

        let checks = providers.iter().map(|provider| async move {
            let result = match tokio::time::timeout(self.timeout, provider.health_check()).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(self.timeout.as_millis() as u64)),
            };
            (provider.id().to_string(), result)
        });

        join_all(checks).await
    }
}

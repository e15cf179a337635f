//! Legal-assistance entry points over the provider failover manager

use std::sync::Arc;
use std::time::Duration;

use payo_providers::{
    Generation, GenerationRequest, ProviderError, ProviderManager, ProviderStatus,
};
use tracing::{debug, info, warn};

use crate::analysis::AnalysisResult;
use crate::error::{LegalError, Result};
use crate::prompts::{self, CaseCategory};

/// Reply used when no provider can answer a conversational turn
pub const REPLY_APOLOGY: &str = "Pasensya na po, nagkakaproblema kami sa ngayon. \
     Pakisubukan po ulit mamaya. (Sorry, we're having trouble right now. Please try again in a moment.)";

const SUMMARY_MAX_TOKENS: usize = 2048;
const ANALYSIS_MAX_TOKENS: usize = 1024;
const STRUCTURED_TEMPERATURE: f32 = 0.3;
const REPLY_MAX_TOKENS: usize = 300;
const REPLY_TEMPERATURE: f32 = 0.7;

/// Legal assistant backed by a prioritised set of AI providers
#[derive(Clone)]
pub struct LegalAssistant {
    manager: Arc<ProviderManager>,
    request_timeout: Option<Duration>,
}

impl LegalAssistant {
    /// Create an assistant over a failover manager
    pub fn new(manager: ProviderManager) -> Self {
        Self::from_shared(Arc::new(manager))
    }

    /// Create an assistant over a shared failover manager
    pub fn from_shared(manager: Arc<ProviderManager>) -> Self {
        Self {
            manager,
            request_timeout: None,
        }
    }

    /// Bound every entry point by an overall deadline
    ///
    /// On expiry the in-flight provider call is abandoned and its outcome discarded.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// The underlying failover manager
    pub fn manager(&self) -> &Arc<ProviderManager> {
        &self.manager
    }

    /// End-of-session summary over the full conversation
    pub async fn generate_structured_summary(
        &self,
        full_text: &str,
        category: &str,
    ) -> Result<AnalysisResult> {
        let category = CaseCategory::parse(category);
        let request = GenerationRequest::json(prompts::summary_prompt(full_text, category))
            .with_system(prompts::analysis_system_prompt())
            .with_temperature(STRUCTURED_TEMPERATURE)
            .with_max_tokens(SUMMARY_MAX_TOKENS);

        let generation = self.run(&request).await?;
        info!(
            "Structured summary ({}) generated by {}",
            category, generation.provider_id
        );
        Ok(AnalysisResult::from_model_output(&generation.content))
    }

    /// Quick analysis of a call still in progress
    pub async fn analyze_situation(
        &self,
        transcript: &str,
        category: &str,
    ) -> Result<AnalysisResult> {
        let category = CaseCategory::parse(category);
        let request = GenerationRequest::json(prompts::analysis_prompt(transcript, category))
            .with_system(prompts::analysis_system_prompt())
            .with_temperature(STRUCTURED_TEMPERATURE)
            .with_max_tokens(ANALYSIS_MAX_TOKENS);

        let generation = self.run(&request).await?;
        debug!("Situation analysis generated by {}", generation.provider_id);
        Ok(AnalysisResult::from_model_output(&generation.content))
    }

    /// Conversational reply; never fails, apologising instead
    pub async fn generate_reply(&self, message: &str, context: &str) -> String {
        let request = GenerationRequest::text(prompts::reply_prompt(message, context))
            .with_system(prompts::reply_system_prompt())
            .with_temperature(REPLY_TEMPERATURE)
            .with_max_tokens(REPLY_MAX_TOKENS);

        match self.run(&request).await {
            Ok(generation) => generation.content.trim().to_string(),
            Err(e) => {
                warn!("Reply generation failed, sending apology: {}", e);
                REPLY_APOLOGY.to_string()
            }
        }
    }

    /// Diagnostic snapshot of every provider
    pub fn provider_status(&self) -> Vec<ProviderStatus> {
        self.manager.provider_status()
    }

    /// Health of every configured provider; does not affect cooldowns
    pub async fn health_check_all(&self) -> Vec<(String, std::result::Result<bool, ProviderError>)> {
        self.manager.health_check_all().await
    }

    async fn run(&self, request: &GenerationRequest) -> Result<Generation> {
        let generation = match self.request_timeout {
            Some(deadline) => tokio::time::timeout(deadline, self.manager.generate(request))
                .await
                .map_err(|_| LegalError::Timeout(deadline))??,
            None => self.manager.generate(request).await?,
        };
        Ok(generation)
    }
}

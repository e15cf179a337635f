//! Integration tests for the legal-assistance entry points

use std::sync::{Arc, Mutex};
use std::time::Duration;

use payo_legal::{AnalysisResult, LegalAssistant, LegalError, DEFAULT_NEXT_ACTION, REPLY_APOLOGY};
use payo_providers::models::{FinishReason, TokenUsage};
use payo_providers::{
    ChatRequest, ChatResponse, OrchestratorError, Provider, ProviderEntry, ProviderError,
    ProviderManager, ProviderRegistry,
};

/// Mock provider that answers every call the same way and keeps the requests it saw
struct RecordingProvider {
    reply: Result<String, ProviderError>,
    delay: Option<Duration>,
    seen: Arc<Mutex<Vec<ChatRequest>>>,
}

#[async_trait::async_trait]
impl Provider for RecordingProvider {
    fn id(&self) -> &str {
        "groq"
    }

    fn name(&self) -> &str {
        "Groq"
    }

    fn model(&self) -> &str {
        "llama-3.3-70b-versatile"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.seen.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone().map(|content| ChatResponse {
            content,
            model: request.model,
            usage: TokenUsage::default(),
            finish_reason: FinishReason::Stop,
        })
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}

fn assistant_with(
    reply: Result<&str, ProviderError>,
) -> (LegalAssistant, Arc<Mutex<Vec<ChatRequest>>>) {
    assistant_with_delay(reply, None)
}

fn assistant_with_delay(
    reply: Result<&str, ProviderError>,
    delay: Option<Duration>,
) -> (LegalAssistant, Arc<Mutex<Vec<ChatRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let provider = Arc::new(RecordingProvider {
        reply: reply.map(str::to_string),
        delay,
        seen: seen.clone(),
    });
    let registry = Arc::new(ProviderRegistry::new());
    registry
        .register(ProviderEntry::new("groq", "Groq", 1).with_client(provider))
        .unwrap();
    (LegalAssistant::new(ProviderManager::new(registry)), seen)
}

fn rate_limited() -> ProviderError {
    ProviderError::ApiError {
        status: 429,
        code: Some("rate_limit_exceeded".to_string()),
        message: "Rate limit reached for model".to_string(),
    }
}

#[tokio::test]
async fn test_structured_summary_normalises_output() {
    let (assistant, seen) = assistant_with(Ok(r#"Here you go:
```json
{
  "situation": "Caller was not paid for two months.",
  "relevantLaws": ["Labor Code, Art. 103"],
  "recommendedSteps": "File a SEnA request at DOLE",
  "watchOutFor": ["Three-year prescriptive period for money claims"],
  "contacts": {"DOLE Hotline": "1349"},
  "nextAction": {"step": "Call PAO", "timeline": "within 24h"}
}
```"#));

    let result = assistant
        .generate_structured_summary("Caller: Hindi po ako pinasweldo.", "labor")
        .await
        .unwrap();

    assert_eq!(result.situation, "Caller was not paid for two months.");
    assert_eq!(result.recommended_steps, vec!["File a SEnA request at DOLE"]);
    assert_eq!(result.next_action, "Call PAO (Timeline: within 24h)");
    assert_eq!(result.contacts["DOLE Hotline"], "1349");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].json_mode);
    assert_eq!(seen[0].temperature, Some(0.3));
    assert_eq!(seen[0].max_tokens, Some(2048));
    assert_eq!(seen[0].messages[0].role, "system");
    assert!(seen[0].messages[1].content.contains("Hindi po ako pinasweldo."));
}

#[tokio::test]
async fn test_analyze_situation_uses_shorter_budget() {
    let (assistant, seen) = assistant_with(Ok(r#"{"situation":"x","nextAction":"Go to the barangay"}"#));

    let result = assistant
        .analyze_situation("Caller: Pinapaalis kami sa bahay.", "property")
        .await
        .unwrap();

    assert_eq!(result.situation, "x");
    assert_eq!(result.next_action, "Go to the barangay");
    assert_eq!(seen.lock().unwrap()[0].max_tokens, Some(1024));
}

#[tokio::test]
async fn test_unparseable_output_degrades_to_fallback() {
    let (assistant, _) = assistant_with(Ok("Pasensya, hindi ko maintindihan."));

    let result = assistant
        .analyze_situation("Caller: ...", "general")
        .await
        .unwrap();

    assert_eq!(result, AnalysisResult::fallback());
    assert_eq!(result.next_action, DEFAULT_NEXT_ACTION);
    assert!(result.contacts.values().any(|number| number == "(02) 8929-9436"));
}

#[tokio::test]
async fn test_structured_call_propagates_exhaustion() {
    let (assistant, _) = assistant_with(Err(rate_limited()));

    let err = assistant
        .generate_structured_summary("Caller: ...", "family")
        .await
        .unwrap_err();

    match err {
        LegalError::Orchestrator(OrchestratorError::AllProvidersExhausted { errors }) => {
            assert!(errors["groq"].contains("429"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let status = assistant.provider_status();
    assert!(!status[0].available);
    assert!(status[0].last_error.is_some());
}

#[tokio::test]
async fn test_empty_registry_errors_and_reply_apologises() {
    let assistant = LegalAssistant::new(ProviderManager::new(Arc::new(ProviderRegistry::new())));

    let err = assistant
        .analyze_situation("Caller: ...", "criminal")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LegalError::Orchestrator(OrchestratorError::NoProvidersAvailable)
    );

    assert_eq!(assistant.generate_reply("Hello po", "").await, REPLY_APOLOGY);
}

#[tokio::test]
async fn test_reply_uses_conversational_settings() {
    let (assistant, seen) = assistant_with(Ok("  Opo, matutulungan ko po kayo.  "));

    let reply = assistant
        .generate_reply("Pwede po ba akong magtanong?", "Caller: Magandang gabi po.")
        .await;

    assert_eq!(reply, "Opo, matutulungan ko po kayo.");
    let seen = seen.lock().unwrap();
    assert!(!seen[0].json_mode);
    assert_eq!(seen[0].temperature, Some(0.7));
    assert_eq!(seen[0].max_tokens, Some(300));
    assert!(seen[0].messages[1].content.contains("Magandang gabi po."));
}

#[tokio::test]
async fn test_reply_apologises_on_failure_and_empty_text() {
    let (assistant, _) = assistant_with(Err(rate_limited()));
    assert_eq!(assistant.generate_reply("Hello", "").await, REPLY_APOLOGY);

    let (assistant, _) = assistant_with(Ok("   "));
    assert_eq!(assistant.generate_reply("Hello", "").await, REPLY_APOLOGY);
}

#[tokio::test]
async fn test_overall_deadline() {
    let (assistant, _) = assistant_with_delay(Ok("{}"), Some(Duration::from_secs(5)));
    let assistant = assistant.with_request_timeout(Duration::from_millis(20));

    let err = assistant
        .analyze_situation("Caller: ...", "general")
        .await
        .unwrap_err();
    assert_eq!(err, LegalError::Timeout(Duration::from_millis(20)));

    // Abandoned calls are not failures of the provider
    assert!(assistant.provider_status()[0].available);
    assert_eq!(
        assistant.generate_reply("Hello", "").await,
        REPLY_APOLOGY
    );
}

#[tokio::test]
async fn test_health_check_all() {
    let (assistant, _) = assistant_with(Ok("ok"));
    let results = assistant.health_check_all().await;
    assert_eq!(results, vec![("groq".to_string(), Ok(true))]);
}

//! Configuration management for providers

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::classification::{CooldownPolicy, QUOTA_COOLDOWN, TRANSIENT_COOLDOWN};
use crate::error::ProviderError;
use crate::models::{CooldownSettings, PayoConfig, ProviderSettings};
use crate::provider::registry::ProviderEntry;
use crate::provider::{Provider, ProviderManager, ProviderRegistry};
use crate::providers::gemini::{GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL};
use crate::providers::openai_compatible::{
    GROQ_BASE_URL, GROQ_DEFAULT_MODEL, OPENAI_BASE_URL, OPENAI_DEFAULT_MODEL,
};
use crate::providers::{GeminiProvider, OpenAiCompatibleProvider};

/// Default per-provider request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Built-in provider kinds: key, display name, priority, base URL, model, API key variable
const BUILTIN_PROVIDERS: &[(&str, &str, u32, &str, &str, &str)] = &[
    ("groq", "Groq", 1, GROQ_BASE_URL, GROQ_DEFAULT_MODEL, "GROQ_API_KEY"),
    ("openai", "OpenAI", 2, OPENAI_BASE_URL, OPENAI_DEFAULT_MODEL, "OPENAI_API_KEY"),
    ("gemini", "Google Gemini", 3, GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL, "GEMINI_API_KEY"),
];

/// Configuration manager for loading and validating provider configuration
pub struct ConfigurationManager {
    config: PayoConfig,
}

impl ConfigurationManager {
    /// Create a configuration manager with built-in defaults
    pub fn new() -> Self {
        let providers = BUILTIN_PROVIDERS
            .iter()
            .map(|(key, name, priority, base_url, model, _)| {
                (
                    key.to_string(),
                    ProviderSettings {
                        enabled: None,
                        api_key: None,
                        base_url: Some(base_url.to_string()),
                        model: Some(model.to_string()),
                        priority: Some(*priority),
                        display_name: Some(name.to_string()),
                    },
                )
            })
            .collect();

        Self {
            config: PayoConfig {
                providers,
                cooldowns: CooldownSettings::default(),
                request_timeout_secs: None,
            },
        }
    }

    /// Load configuration with proper precedence:
    /// 1. Environment variables, including `.env` (highest priority)
    /// 2. Project config (./payo.yaml)
    /// 3. Global config (~/.payo/config.yaml)
    /// 4. Built-in defaults (lowest priority)
    pub fn load_with_precedence(&mut self) -> Result<(), ProviderError> {
        if let Some(global) = Self::get_global_config_path() {
            self.merge_from_file(&global)?;
        }
        self.merge_from_file(&Self::get_project_config_path())?;

        if dotenv::dotenv().is_ok() {
            debug!("Loaded environment from .env");
        }
        self.load_from_env()
    }

    /// Get the global configuration path
    pub fn get_global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".payo").join("config.yaml"))
    }

    /// Get the project configuration path
    pub fn get_project_config_path() -> PathBuf {
        PathBuf::from("./payo.yaml")
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) -> Result<(), ProviderError> {
        for (key, _, _, _, _, env_var) in BUILTIN_PROVIDERS {
            if let Ok(api_key) = std::env::var(env_var) {
                self.set_api_key(key, api_key);
            }
        }

        for (name, value) in std::env::vars() {
            let Some(provider_id) = name.strip_prefix("PAYO_PROVIDER_") else {
                continue;
            };
            let provider_id = provider_id.to_lowercase();
            if BUILTIN_PROVIDERS.iter().any(|(known, ..)| *known == provider_id) {
                self.set_api_key(&provider_id, value);
            } else {
                warn!("Ignoring {}: unknown provider", name);
            }
        }

        if let Ok(raw) = std::env::var("PAYO_REQUEST_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ProviderError::ConfigError(format!(
                    "PAYO_REQUEST_TIMEOUT_SECS must be a whole number, got '{}'",
                    raw
                ))
            })?;
            self.config.request_timeout_secs = Some(secs);
        }

        Ok(())
    }

    fn set_api_key(&mut self, provider_id: &str, api_key: String) {
        if api_key.trim().is_empty() {
            return;
        }
        self.config
            .providers
            .entry(provider_id.to_string())
            .or_default()
            .api_key = Some(api_key);
    }

    /// Merge configuration from a YAML file; a missing file is skipped
    pub fn merge_from_file(&mut self, path: &Path) -> Result<(), ProviderError> {
        if !path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::ConfigError(format!("Failed to read config file: {}", e))
        })?;
        self.merge_from_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(())
    }

    /// Merge configuration from YAML text
    pub fn merge_from_str(&mut self, content: &str) -> Result<(), ProviderError> {
        let new_config: PayoConfig = serde_yaml::from_str(content).map_err(|e| {
            ProviderError::ConfigError(format!("Failed to parse config file: {}", e))
        })?;

        for (provider_id, settings) in new_config.providers {
            self.config
                .providers
                .entry(provider_id)
                .and_modify(|existing| {
                    if settings.enabled.is_some() {
                        existing.enabled = settings.enabled;
                    }
                    if settings.api_key.is_some() {
                        existing.api_key = settings.api_key.clone();
                    }
                    if settings.base_url.is_some() {
                        existing.base_url = settings.base_url.clone();
                    }
                    if settings.model.is_some() {
                        existing.model = settings.model.clone();
                    }
                    if settings.priority.is_some() {
                        existing.priority = settings.priority;
                    }
                    if settings.display_name.is_some() {
                        existing.display_name = settings.display_name.clone();
                    }
                })
                .or_insert(settings);
        }

        let cooldowns = new_config.cooldowns;
        if cooldowns.quota_cooldown_ms.is_some() {
            self.config.cooldowns.quota_cooldown_ms = cooldowns.quota_cooldown_ms;
        }
        if cooldowns.transient_cooldown_ms.is_some() {
            self.config.cooldowns.transient_cooldown_ms = cooldowns.transient_cooldown_ms;
        }
        if new_config.request_timeout_secs.is_some() {
            self.config.request_timeout_secs = new_config.request_timeout_secs;
        }

        Ok(())
    }

    /// Validate the current configuration
    ///
    /// Validates:
    /// - Every provider key is a known provider kind
    /// - Timeouts and cooldowns are non-zero
    pub fn validate(&self) -> Result<(), ProviderError> {
        for key in self.config.providers.keys() {
            if !BUILTIN_PROVIDERS.iter().any(|(known, ..)| *known == key.as_str()) {
                return Err(ProviderError::ConfigError(format!(
                    "Unknown provider '{}'",
                    key
                )));
            }
        }

        if self.config.request_timeout_secs == Some(0) {
            return Err(ProviderError::ConfigError(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let cooldowns = &self.config.cooldowns;
        let zero = [
            ("quota_cooldown_ms", cooldowns.quota_cooldown_ms),
            ("transient_cooldown_ms", cooldowns.transient_cooldown_ms),
        ]
        .into_iter()
        .find(|(_, value)| *value == Some(0));
        if let Some((name, _)) = zero {
            return Err(ProviderError::ConfigError(format!(
                "{} must be greater than zero",
                name
            )));
        }

        Ok(())
    }

    /// Per-provider request timeout
    pub fn request_timeout(&self) -> Duration {
        self.config
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Cooldown durations applied by the failover loop
    pub fn cooldown_policy(&self) -> CooldownPolicy {
        let cooldowns = &self.config.cooldowns;
        CooldownPolicy {
            quota: cooldowns
                .quota_cooldown_ms
                .map(Duration::from_millis)
                .unwrap_or(QUOTA_COOLDOWN),
            transient: cooldowns
                .transient_cooldown_ms
                .map(Duration::from_millis)
                .unwrap_or(TRANSIENT_COOLDOWN),
        }
    }

    /// Build the provider registry
    ///
    /// Providers without credentials are registered disabled so they still
    /// show up in status output.
    pub fn build_registry(&self) -> Result<ProviderRegistry, ProviderError> {
        self.validate()?;
        let registry = ProviderRegistry::new();

        // Registration order follows the built-in list so priority ties stay stable.
        for (key, name, priority, ..) in BUILTIN_PROVIDERS {
            let Some(settings) = self.config.providers.get(*key) else {
                continue;
            };

            let display_name = settings.display_name.as_deref().unwrap_or(name);
            let priority = settings.priority.unwrap_or(*priority);
            let mut entry = ProviderEntry::new(*key, display_name, priority);

            if let Some(client) = self.build_client(key, settings)? {
                entry = entry.with_client(client);
            } else {
                debug!("Provider {} has no credentials, registering disabled", key);
            }
            if let Some(enabled) = settings.enabled {
                entry = entry.with_enabled(enabled);
            }

            registry.register(entry)?;
        }

        if registry.enabled_keys().is_empty() {
            warn!("No AI provider credentials configured");
        }
        Ok(registry)
    }

    /// Build a ready-to-use failover manager
    pub fn build_manager(&self) -> Result<ProviderManager, ProviderError> {
        let registry = Arc::new(self.build_registry()?);
        Ok(ProviderManager::new(registry)
            .with_timeout(self.request_timeout())
            .with_cooldowns(self.cooldown_policy()))
    }

    fn build_client(
        &self,
        key: &str,
        settings: &ProviderSettings,
    ) -> Result<Option<Arc<dyn Provider>>, ProviderError> {
        let Some(api_key) = settings.api_key.clone().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };

        let client: Arc<dyn Provider> = match key {
            "groq" | "openai" => {
                let mut provider = if key == "groq" {
                    OpenAiCompatibleProvider::groq(api_key)?
                } else {
                    OpenAiCompatibleProvider::openai(api_key)?
                };
                if let Some(base_url) = &settings.base_url {
                    provider = provider.with_base_url(base_url.clone());
                }
                if let Some(model) = &settings.model {
                    provider = provider.with_model(model.clone());
                }
                Arc::new(provider)
            }
            "gemini" => {
                let mut provider = GeminiProvider::new(api_key)?;
                if let Some(base_url) = &settings.base_url {
                    provider = provider.with_base_url(base_url.clone());
                }
                if let Some(model) = &settings.model {
                    provider = provider.with_model(model.clone());
                }
                Arc::new(provider)
            }
            other => {
                return Err(ProviderError::ConfigError(format!(
                    "Unknown provider '{}'",
                    other
                )))
            }
        };
        Ok(Some(client))
    }

    /// Get the current configuration
    pub fn config(&self) -> &PayoConfig {
        &self.config
    }

    /// Get mutable configuration
    pub fn config_mut(&mut self) -> &mut PayoConfig {
        &mut self.config
    }

    /// Settings for a provider
    pub fn provider_settings(&self, key: &str) -> Option<&ProviderSettings> {
        self.config.providers.get(key)
    }

    /// All provider settings
    pub fn providers(&self) -> &HashMap<String, ProviderSettings> {
        &self.config.providers
    }
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

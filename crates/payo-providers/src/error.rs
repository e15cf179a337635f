//! Error types for the providers module

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors that can occur when talking to a single provider
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ProviderError {
    /// Provider not found by key
    #[error("Provider not found: {0}")]
    NotFound(String),

    /// Authentication failed (never includes key details)
    #[error("Authentication failed")]
    AuthError,

    /// Rate limited by provider
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Non-success response from a provider API
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status returned by the provider
        status: u16,
        /// Provider-specific error code (e.g. `insufficient_quota`)
        code: Option<String>,
        /// Message extracted from the error body
        message: String,
    },

    /// Provider answered but produced no usable text
    #[error("Provider returned an empty response")]
    EmptyResponse,

    /// Provider did not answer within the request timeout
    #[error("Request timeout after {0} ms")]
    Timeout(u64),

    /// Network error occurred
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Generic provider error
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Model output could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ProviderError {
    /// HTTP status carried by this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProviderError::ApiError { status, .. } => Some(*status),
            ProviderError::RateLimited(_) => Some(429),
            ProviderError::AuthError => Some(401),
            _ => None,
        }
    }

    /// Provider-specific error code carried by this error, if any
    pub fn error_code(&self) -> Option<&str> {
        match self {
            ProviderError::ApiError { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::ProviderError("Request timeout".to_string())
        } else if err.is_connect() {
            ProviderError::NetworkError(err.to_string())
        } else {
            ProviderError::ProviderError(err.to_string())
        }
    }
}

/// Errors surfaced by the failover loop once every option is used up
#[derive(Debug, Error, PartialEq, Clone)]
pub enum OrchestratorError {
    /// No provider is configured and enabled
    #[error("No AI providers available")]
    NoProvidersAvailable,

    /// Every enabled provider failed or is cooling down
    #[error("All AI providers exhausted: {}", format_errors(.errors))]
    AllProvidersExhausted {
        /// Last error message per provider key
        errors: BTreeMap<String, String>,
    },
}

fn format_errors(errors: &BTreeMap<String, String>) -> String {
    if errors.is_empty() {
        return "no errors recorded".to_string();
    }
    errors
        .iter()
        .map(|(key, message)| format!("{key}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

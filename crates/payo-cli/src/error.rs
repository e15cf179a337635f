// CLI error types

use payo_legal::LegalError;
use payo_providers::OrchestratorError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'payo --help' for usage information.",
                    message
                )
            }
            CliError::Io(e) => {
                format!("File operation failed: {}", e)
            }
            CliError::Config(msg) => {
                format!(
                    "Configuration error: {}\n\nCheck ~/.payo/config.yaml, ./payo.yaml and your API key variables.",
                    msg
                )
            }
            CliError::Provider(msg) => {
                format!(
                    "Provider error: {}\n\nRun 'payo status' to see which providers are cooling down.",
                    msg
                )
            }
            CliError::Internal(msg) => {
                format!("Internal error: {}\n\nPlease report this issue.", msg)
            }
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

impl From<LegalError> for CliError {
    fn from(err: LegalError) -> Self {
        match err {
            LegalError::Orchestrator(OrchestratorError::NoProvidersAvailable) => CliError::Config(
                "no AI provider has an API key (set GROQ_API_KEY, OPENAI_API_KEY or GEMINI_API_KEY)"
                    .to_string(),
            ),
            other => CliError::Provider(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Internal(format!("Failed to serialize output: {}", err))
    }
}

pub type CliResult<T> = Result<T, CliError>;

//! Error types for the legal-assistance entry points

use std::time::Duration;

use payo_providers::OrchestratorError;
use thiserror::Error;

/// Errors surfaced by the structured entry points
#[derive(Debug, Error, PartialEq)]
pub enum LegalError {
    /// No provider could produce an answer
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    /// The whole request ran past its deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for legal-assistance operations
pub type Result<T> = std::result::Result<T, LegalError>;

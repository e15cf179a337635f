// Command handlers for the payo CLI

pub mod analyze;
pub mod health;
pub mod reply;
pub mod status;

pub use analyze::{AnalysisKind, AnalyzeCommand};
pub use health::HealthCommand;
pub use reply::ReplyCommand;
pub use status::StatusCommand;

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use payo_legal::LegalAssistant;
use payo_providers::ConfigurationManager;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command
    async fn execute(&self) -> CliResult<()>;
}

/// Load configuration with the usual precedence and build an assistant
pub fn load_assistant(timeout_secs: Option<u64>) -> CliResult<LegalAssistant> {
    let mut config = ConfigurationManager::new();
    config
        .load_with_precedence()
        .map_err(|e| CliError::Config(e.to_string()))?;
    assistant_from_config(&config, timeout_secs)
}

/// Build an assistant from already-loaded configuration
pub fn assistant_from_config(
    config: &ConfigurationManager,
    timeout_secs: Option<u64>,
) -> CliResult<LegalAssistant> {
    if timeout_secs == Some(0) {
        return Err(CliError::InvalidArgument {
            message: "--timeout must be greater than zero".to_string(),
        });
    }

    let manager = config
        .build_manager()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let assistant = LegalAssistant::new(manager);
    Ok(match timeout_secs {
        Some(secs) => {
            debug!("Overall request deadline: {}s", secs);
            assistant.with_request_timeout(Duration::from_secs(secs))
        }
        None => assistant,
    })
}

/// Read transcript text from a file, an argument, or stdin
pub fn read_transcript(file: Option<&Path>, text: Option<&str>) -> CliResult<String> {
    let transcript = match (file, text) {
        (Some(path), _) => std::fs::read_to_string(path)?,
        (None, Some(text)) => text.to_string(),
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    if transcript.trim().is_empty() {
        return Err(CliError::InvalidArgument {
            message: "the transcript is empty".to_string(),
        });
    }
    Ok(transcript)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_transcript_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Caller: Tinanggal po ako sa trabaho.").unwrap();

        let transcript = read_transcript(Some(file.path()), None).unwrap();
        assert!(transcript.contains("Tinanggal"));
    }

    #[test]
    fn test_read_transcript_from_text() {
        assert_eq!(read_transcript(None, Some("hello")).unwrap(), "hello");
    }

    #[test]
    fn test_blank_transcript_rejected() {
        assert!(matches!(
            read_transcript(None, Some("  \n")),
            Err(CliError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_transcript(Some(&dir.path().join("missing.txt")), None);
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ConfigurationManager::new();
        assert!(matches!(
            assistant_from_config(&config, Some(0)),
            Err(CliError::InvalidArgument { .. })
        ));
        assert!(assistant_from_config(&config, Some(5)).is_ok());
    }
}

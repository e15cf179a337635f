//! Summarize and analyze commands

use crate::commands::{load_assistant, read_transcript, Command};
use crate::error::CliResult;
use crate::output::OutputStyle;
use crate::router::AnalysisInput;

/// Which structured entry point to call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    /// End-of-session summary over the whole conversation
    Summary,
    /// Shorter analysis while the call is going
    InCall,
}

/// Analysis command handler
pub struct AnalyzeCommand {
    kind: AnalysisKind,
    input: AnalysisInput,
    timeout: Option<u64>,
}

impl AnalyzeCommand {
    /// Create a new analysis command
    pub fn new(kind: AnalysisKind, input: AnalysisInput, timeout: Option<u64>) -> Self {
        Self {
            kind,
            input,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl Command for AnalyzeCommand {
    async fn execute(&self) -> CliResult<()> {
        let transcript = read_transcript(self.input.file.as_deref(), self.input.text.as_deref())?;
        let assistant = load_assistant(self.timeout)?;

        let result = match self.kind {
            AnalysisKind::Summary => {
                assistant
                    .generate_structured_summary(&transcript, &self.input.category)
                    .await?
            }
            AnalysisKind::InCall => {
                assistant
                    .analyze_situation(&transcript, &self.input.category)
                    .await?
            }
        };

        if self.input.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", OutputStyle::default().analysis(&result));
        }
        Ok(())
    }
}

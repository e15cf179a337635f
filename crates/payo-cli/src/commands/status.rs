//! Status command - provider availability snapshot

use crate::commands::{load_assistant, Command};
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Status command handler
pub struct StatusCommand {
    json: bool,
}

impl StatusCommand {
    /// Create a new status command
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

#[async_trait::async_trait]
impl Command for StatusCommand {
    async fn execute(&self) -> CliResult<()> {
        let assistant = load_assistant(None)?;
        let status = assistant.provider_status();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&status)?);
            return Ok(());
        }

        let style = OutputStyle::default();
        println!("{}", style.header("AI providers (tried in this order)"));
        for row in &status {
            println!("  {}", style.status_row(row));
        }
        if !status.iter().any(|row| row.enabled) {
            println!(
                "\n{}",
                style.warning("No provider is configured. Set GROQ_API_KEY, OPENAI_API_KEY or GEMINI_API_KEY.")
            );
        }
        Ok(())
    }
}

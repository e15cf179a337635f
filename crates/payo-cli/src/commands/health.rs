//! Health command - check every configured provider

use crate::commands::{load_assistant, Command};
use crate::error::{CliError, CliResult};
use crate::output::OutputStyle;

/// Health command handler
pub struct HealthCommand {
    timeout: Option<u64>,
}

impl HealthCommand {
    /// Create a new health command
    pub fn new(timeout: Option<u64>) -> Self {
        Self { timeout }
    }
}

#[async_trait::async_trait]
impl Command for HealthCommand {
    async fn execute(&self) -> CliResult<()> {
        let assistant = load_assistant(self.timeout)?;
        let results = assistant.health_check_all().await;
        if results.is_empty() {
            return Err(CliError::Config(
                "no AI provider has an API key configured".to_string(),
            ));
        }

        let style = OutputStyle::default();
        let mut unhealthy = 0;
        for (key, result) in &results {
            match result {
                Ok(true) => println!("{}", style.success(&format!("{}: healthy", key))),
                Ok(false) => {
                    unhealthy += 1;
                    println!("{}", style.warning(&format!("{}: unhealthy", key)));
                }
                Err(e) => {
                    unhealthy += 1;
                    println!("{}", style.error(&format!("{}: {}", key, e)));
                }
            }
        }

        if unhealthy == results.len() {
            return Err(CliError::Provider(
                "no configured provider passed its health check".to_string(),
            ));
        }
        Ok(())
    }
}

//! Reply command - one conversational turn

use crate::commands::{load_assistant, Command};
use crate::error::CliResult;

/// Reply command handler
pub struct ReplyCommand {
    message: String,
    context: Option<String>,
    timeout: Option<u64>,
}

impl ReplyCommand {
    /// Create a new reply command
    pub fn new(message: String, context: Option<String>, timeout: Option<u64>) -> Self {
        Self {
            message,
            context,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl Command for ReplyCommand {
    async fn execute(&self) -> CliResult<()> {
        let assistant = load_assistant(self.timeout)?;
        let reply = assistant
            .generate_reply(&self.message, self.context.as_deref().unwrap_or(""))
            .await;
        println!("{}", reply);
        Ok(())
    }
}

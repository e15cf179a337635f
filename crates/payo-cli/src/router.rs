// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::*;
use crate::error::CliResult;

/// Payo - AI legal-assistance orchestrator
#[derive(Parser, Debug)]
#[command(name = "payo")]
#[command(bin_name = "payo")]
#[command(about = "Legal guidance for Filipino callers, backed by failover across AI providers")]
#[command(
    long_about = "Payo turns conversations into structured legal guidance using whichever AI provider is currently able to answer.\n\nQuick start:\n  • export GROQ_API_KEY=...\n  • payo status                 See which providers are ready\n  • payo analyze -c labor FILE  Analyze a transcript\n  • payo reply \"Hello po\"       Get a conversational reply"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Overall deadline for a request, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show provider availability, cooldowns and last errors
    Status {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check connectivity and credentials of every configured provider
    Health,

    /// Produce an end-of-session structured summary
    Summarize {
        #[command(flatten)]
        input: AnalysisInput,
    },

    /// Produce a quick analysis of a call in progress
    Analyze {
        #[command(flatten)]
        input: AnalysisInput,
    },

    /// Produce a short conversational reply
    Reply {
        /// The caller's message
        #[arg(value_name = "MESSAGE")]
        message: String,

        /// Earlier conversation, as plain text
        #[arg(long)]
        context: Option<String>,
    },
}

/// Where a transcript comes from and how to present the analysis
#[derive(clap::Args, Debug, Clone)]
pub struct AnalysisInput {
    /// Case category (e.g. labor, vawc, property, family, criminal, consumer)
    #[arg(short, long, default_value = "general")]
    pub category: String,

    /// Read the transcript from a file; stdin is used when neither file nor text is given
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Transcript text
    #[arg(value_name = "TEXT", conflicts_with = "file")]
    pub text: Option<String>,

    /// Print JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to appropriate handler
    pub async fn route() -> CliResult<()> {
        let cli = Cli::parse();

        // Initialize logging based on CLI flags
        crate::logging::init_logging(cli.verbose, cli.quiet);

        Self::execute(&cli).await
    }

    /// Execute a command
    pub async fn execute(cli: &Cli) -> CliResult<()> {
        match &cli.command {
            Commands::Status { json } => StatusCommand::new(*json).execute().await,
            Commands::Health => HealthCommand::new(cli.timeout).execute().await,
            Commands::Summarize { input } => {
                AnalyzeCommand::new(AnalysisKind::Summary, input.clone(), cli.timeout)
                    .execute()
                    .await
            }
            Commands::Analyze { input } => {
                AnalyzeCommand::new(AnalysisKind::InCall, input.clone(), cli.timeout)
                    .execute()
                    .await
            }
            Commands::Reply { message, context } => {
                ReplyCommand::new(message.clone(), context.clone(), cli.timeout)
                    .execute()
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_with_file() {
        let cli = Cli::try_parse_from(["payo", "analyze", "-c", "labor", "-f", "call.txt"]).unwrap();
        match cli.command {
            Commands::Analyze { input } => {
                assert_eq!(input.category, "labor");
                assert_eq!(input.file, Some(PathBuf::from("call.txt")));
                assert!(input.text.is_none());
                assert!(!input.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_summarize_defaults() {
        let cli = Cli::try_parse_from(["payo", "summarize", "Caller: Tulong po"]).unwrap();
        match cli.command {
            Commands::Summarize { input } => {
                assert_eq!(input.category, "general");
                assert_eq!(input.text.as_deref(), Some("Caller: Tulong po"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_file_and_text_conflict() {
        assert!(Cli::try_parse_from(["payo", "analyze", "-f", "a.txt", "text"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["payo", "reply", "Hello", "--timeout", "20", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.timeout, Some(20));
        assert!(matches!(cli.command, Commands::Reply { .. }));
    }

    #[test]
    fn test_command_required() {
        assert!(Cli::try_parse_from(["payo"]).is_err());
    }
}

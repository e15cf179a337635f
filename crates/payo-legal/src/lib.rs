//! Payo legal assistance
//!
//! Turns conversations with Filipino callers into structured legal guidance
//! and short spoken replies, using whichever AI provider is currently able to
//! answer.
//!
//! # Example
//!
//! ```ignore
//! use payo_legal::LegalAssistant;
//! use payo_providers::ConfigurationManager;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = ConfigurationManager::new();
//!     config.load_with_precedence()?;
//!     let assistant = LegalAssistant::new(config.build_manager()?);
//!
//!     let analysis = assistant
//!         .analyze_situation("Hindi po ako binayaran ng employer ko.", "labor")
//!         .await?;
//!     println!("{}", analysis.next_action);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod analysis;
pub mod assistant;
pub mod error;
pub mod prompts;

pub use analysis::{flatten_next_action, hotline_contacts, AnalysisResult, DEFAULT_NEXT_ACTION};
pub use assistant::{LegalAssistant, REPLY_APOLOGY};
pub use error::{LegalError, Result};
pub use prompts::CaseCategory;

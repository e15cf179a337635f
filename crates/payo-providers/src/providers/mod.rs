//! Provider implementations for hosted language-model APIs

pub mod gemini;
pub mod openai_compatible;

pub use gemini::GeminiProvider;
pub use openai_compatible::OpenAiCompatibleProvider;

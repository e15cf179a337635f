//! Credential redaction for logged and recorded provider errors
//!
//! Provider error bodies and request URLs can echo credentials back (Gemini
//! takes its key as a query parameter), so every message that reaches a log
//! line or the last-error map goes through [`redact`] first.

use std::sync::OnceLock;

use regex::Regex;

/// Redaction filter for removing sensitive information from strings
pub struct RedactionFilter {
    patterns: Vec<RedactionPattern>,
}

struct RedactionPattern {
    regex: Regex,
    replacement: &'static str,
}

impl RedactionFilter {
    /// Create a new redaction filter with the default patterns
    pub fn new() -> Self {
        let pattern = |regex: &str, replacement: &'static str| RedactionPattern {
            regex: Regex::new(regex).expect("redaction pattern is valid"),
            replacement,
        };

        Self {
            patterns: vec![
                // Groq API keys (gsk_*)
                pattern(r"gsk_[A-Za-z0-9]{20,}", "[REDACTED_GROQ_KEY]"),
                // OpenAI API keys (sk-*, sk-proj-*)
                pattern(r"sk-[A-Za-z0-9_\-]{20,}", "[REDACTED_OPENAI_KEY]"),
                // Google API keys (AIza*)
                pattern(r"AIza[0-9A-Za-z_\-]{30,}", "[REDACTED_GOOGLE_KEY]"),
                // Query-string keys
                pattern(r"([?&]key=)[^&\s]+", "${1}[REDACTED]"),
                // Bearer tokens
                pattern(r"(?i)bearer\s+[A-Za-z0-9._\-/+=]+", "Bearer [REDACTED]"),
                // Environment variable assignments
                pattern(
                    r"(?i)(GROQ|OPENAI|GEMINI|GOOGLE)_API_KEY\s*=\s*[^\s,;]+",
                    "${1}_API_KEY=[REDACTED]",
                ),
            ],
        }
    }

    /// Redact sensitive information from a string
    pub fn redact(&self, input: &str) -> String {
        let mut result = input.to_string();
        for pattern in &self.patterns {
            result = pattern
                .regex
                .replace_all(&result, pattern.replacement)
                .into_owned();
        }
        result
    }

    /// Check if a string contains any sensitive information
    pub fn contains_sensitive_info(&self, input: &str) -> bool {
        self.patterns.iter().any(|p| p.regex.is_match(input))
    }
}

impl Default for RedactionFilter {
    fn default() -> Self {
        Self::new()
    }
}

fn filter() -> &'static RedactionFilter {
    static FILTER: OnceLock<RedactionFilter> = OnceLock::new();
    FILTER.get_or_init(RedactionFilter::new)
}

/// Redact sensitive information using the shared filter
pub fn redact(input: &str) -> String {
    filter().redact(input)
}

//! JSON recovery from free-form model output
//!
//! Models asked for JSON often wrap it in a fenced code block or surround it
//! with prose. Extraction tries, in order: the whole text, the first fenced
//! block, then the greedy span from the first `{` to the last `}`. Only JSON
//! objects count as a match.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::ProviderError;

fn fenced_block() -> &'static Regex {
    static FENCED: OnceLock<Regex> = OnceLock::new();
    FENCED.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("fenced block pattern is valid")
    })
}

fn object_span() -> &'static Regex {
    static SPAN: OnceLock<Regex> = OnceLock::new();
    SPAN.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("object span pattern is valid"))
}

fn parse_object(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Parse the whole text as a JSON object
pub fn parse_direct(text: &str) -> Option<Value> {
    parse_object(text)
}

/// Parse the interior of the first fenced code block
pub fn parse_fenced(text: &str) -> Option<Value> {
    fenced_block()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|inner| parse_object(inner.as_str()))
}

/// Parse the span from the first `{` to the last `}`
pub fn parse_object_span(text: &str) -> Option<Value> {
    object_span()
        .find(text)
        .and_then(|span| parse_object(span.as_str()))
}

/// Recover a JSON object from model output
pub fn extract_json(text: &str) -> Result<Value, ProviderError> {
    if let Some(value) = parse_direct(text) {
        return Ok(value);
    }
    if let Some(value) = parse_fenced(text) {
        debug!("Recovered JSON from fenced block");
        return Ok(value);
    }
    if let Some(value) = parse_object_span(text) {
        debug!("Recovered JSON from object span");
        return Ok(value);
    }

    Err(ProviderError::ParseError(
        "no JSON object found in model output".to_string(),
    ))
}

//! Structured legal analysis and its normalisation from model output
//!
//! Model output is untrusted: fields may be missing, lists may arrive as a
//! single string and `nextAction` may be an object instead of text. Anything
//! that cannot be read as a JSON object degrades to [`AnalysisResult::fallback`].

use std::collections::BTreeMap;

use payo_providers::extract_json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Next action used when the model gives none
pub const DEFAULT_NEXT_ACTION: &str =
    "Contact the Public Attorney's Office (PAO) for free legal assistance.";

/// Situation text of the fallback analysis
pub const FALLBACK_SITUATION: &str = "We could not fully analyze your situation right now. \
     Your concern is still important, so please reach out to the offices below for direct help.";

/// Philippine hotlines included in every fallback analysis
pub const HOTLINES: &[(&str, &str)] = &[
    ("PAO (Public Attorney's Office)", "(02) 8929-9436"),
    ("PNP Emergency", "911"),
    ("DSWD", "(02) 8931-8101"),
    ("CHR (Commission on Human Rights)", "(02) 8294-8704"),
    ("IBP (Integrated Bar of the Philippines)", "(02) 8631-3014"),
];

/// Structured legal output returned to callers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Plain-language restatement of the user's situation
    pub situation: String,
    /// Laws that may apply
    pub relevant_laws: Vec<String>,
    /// Steps the user can take
    pub recommended_steps: Vec<String>,
    /// Risks and deadlines to watch for
    pub watch_out_for: Vec<String>,
    /// Offices to contact, name to number
    pub contacts: BTreeMap<String, String>,
    /// The single most important next step
    pub next_action: String,
}

impl AnalysisResult {
    /// Fixed analysis used when model output cannot be read
    pub fn fallback() -> Self {
        Self {
            situation: FALLBACK_SITUATION.to_string(),
            relevant_laws: Vec::new(),
            recommended_steps: vec![
                "Write down what happened, with dates, places and the people involved.".to_string(),
                "Keep copies of any documents, messages or photos related to your concern."
                    .to_string(),
                "Visit or call the nearest Public Attorney's Office for free legal advice."
                    .to_string(),
            ],
            watch_out_for: vec![
                "Do not sign documents you do not fully understand.".to_string(),
                "Call 911 right away if you are in immediate danger.".to_string(),
            ],
            contacts: hotline_contacts(),
            next_action: DEFAULT_NEXT_ACTION.to_string(),
        }
    }

    /// Build an analysis from raw model output, falling back when no JSON object is found
    pub fn from_model_output(text: &str) -> Self {
        match extract_json(text) {
            Ok(Value::Object(fields)) => Self::from_fields(&fields),
            Ok(_) => Self::fallback(),
            Err(e) => {
                warn!("Model output was not a JSON object, using fallback analysis");
                debug!("Extraction failure: {}", e);
                Self::fallback()
            }
        }
    }

    /// Normalise a parsed JSON object
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            situation: fields.get("situation").map(text).unwrap_or_default(),
            relevant_laws: string_list(fields.get("relevantLaws")),
            recommended_steps: string_list(fields.get("recommendedSteps")),
            watch_out_for: string_list(fields.get("watchOutFor")),
            contacts: string_map(fields.get("contacts")),
            next_action: flatten_next_action(fields.get("nextAction")),
        }
    }
}

/// The fallback hotlines as a contact map
pub fn hotline_contacts() -> BTreeMap<String, String> {
    HOTLINES
        .iter()
        .map(|(name, number)| (name.to_string(), number.to_string()))
        .collect()
}

/// Flatten `nextAction` into a single line
///
/// `{step, timeline}` becomes `"{step} (Timeline: {timeline})"`, a bare step is
/// used as is, and anything empty becomes [`DEFAULT_NEXT_ACTION`].
pub fn flatten_next_action(value: Option<&Value>) -> String {
    let flattened = match value {
        Some(Value::String(s)) => non_empty(s),
        Some(Value::Object(fields)) => {
            let step = fields.get("step").map(text).and_then(|s| non_empty(&s));
            let timeline = fields.get("timeline").map(text).and_then(|s| non_empty(&s));
            match (step, timeline) {
                (Some(step), Some(timeline)) => Some(format!("{} (Timeline: {})", step, timeline)),
                (Some(step), None) => Some(step),
                _ => None,
            }
        }
        _ => None,
    };

    flattened.unwrap_or_else(|| DEFAULT_NEXT_ACTION.to_string())
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(text)
            .filter(|item| !item.trim().is_empty())
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(single) => non_empty(&text(single)).into_iter().collect(),
    }
}

fn string_map(value: Option<&Value>) -> BTreeMap<String, String> {
    match value {
        Some(Value::Object(fields)) => fields
            .iter()
            .map(|(name, value)| (name.clone(), text(value)))
            .filter(|(_, value)| !value.trim().is_empty())
            .collect(),
        _ => BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_plain_object() {
        let result = AnalysisResult::from_model_output(r#"{"situation":"x"}"#);
        assert_eq!(result.situation, "x");
        assert!(result.relevant_laws.is_empty());
        assert!(result.contacts.is_empty());
        assert_eq!(result.next_action, DEFAULT_NEXT_ACTION);
    }

    #[test]
    fn test_fenced_object_matches_plain() {
        let plain = AnalysisResult::from_model_output(r#"{"situation":"x"}"#);
        let fenced = AnalysisResult::from_model_output("```json\n{\"situation\":\"x\"}\n```");
        assert_eq!(plain, fenced);
    }

    #[test]
    fn test_non_json_falls_back() {
        let result = AnalysisResult::from_model_output("Sorry, I cannot help with that.");
        assert_eq!(result, AnalysisResult::fallback());
        assert_eq!(
            result.contacts.get("PAO (Public Attorney's Office)").map(String::as_str),
            Some("(02) 8929-9436")
        );
        assert_eq!(result.contacts.get("PNP Emergency").map(String::as_str), Some("911"));
        assert_eq!(result.contacts.len(), 5);
    }

    #[test]
    fn test_next_action_with_timeline() {
        let value = json!({"step": "Call PAO", "timeline": "within 24h"});
        assert_eq!(
            flatten_next_action(Some(&value)),
            "Call PAO (Timeline: within 24h)"
        );
    }

    #[test]
    fn test_next_action_step_only() {
        let value = json!({"step": "Call PAO"});
        assert_eq!(flatten_next_action(Some(&value)), "Call PAO");

        let blank_timeline = json!({"step": "Call PAO", "timeline": "  "});
        assert_eq!(flatten_next_action(Some(&blank_timeline)), "Call PAO");
    }

    #[test]
    fn test_next_action_missing_step() {
        let value = json!({"timeline": "today"});
        assert_eq!(flatten_next_action(Some(&value)), DEFAULT_NEXT_ACTION);
        assert_eq!(flatten_next_action(None), DEFAULT_NEXT_ACTION);
        assert_eq!(flatten_next_action(Some(&json!(""))), DEFAULT_NEXT_ACTION);
    }

    #[test]
    fn test_next_action_string_kept() {
        let value = json!("Go to the barangay hall");
        assert_eq!(flatten_next_action(Some(&value)), "Go to the barangay hall");
    }

    #[test]
    fn test_lists_are_coerced() {
        let fields = json!({
            "situation": "Hindi binayaran ang sahod",
            "relevantLaws": "Labor Code of the Philippines",
            "recommendedSteps": ["File a complaint at DOLE", "", null],
            "watchOutFor": null,
            "contacts": {"DOLE": "1349", "Blank": ""}
        });
        let Value::Object(fields) = fields else {
            unreachable!()
        };

        let result = AnalysisResult::from_fields(&fields);
        assert_eq!(result.relevant_laws, vec!["Labor Code of the Philippines"]);
        assert_eq!(result.recommended_steps, vec!["File a complaint at DOLE"]);
        assert!(result.watch_out_for.is_empty());
        assert_eq!(result.contacts.len(), 1);
        assert_eq!(result.contacts["DOLE"], "1349");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(AnalysisResult::fallback()).unwrap();
        assert!(json.get("relevantLaws").is_some());
        assert!(json.get("watchOutFor").is_some());
        assert_eq!(json["nextAction"], DEFAULT_NEXT_ACTION);
    }
}

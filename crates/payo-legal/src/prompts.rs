//! Prompt construction for the legal-assistance entry points

use serde::{Deserialize, Serialize};

/// Longest transcript slice sent for an end-of-session summary
pub const SUMMARY_MAX_CHARS: usize = 12_000;
/// Longest transcript slice sent for in-call analysis
pub const ANALYSIS_MAX_CHARS: usize = 6_000;
/// Longest conversation context sent with a reply
pub const REPLY_CONTEXT_MAX_CHARS: usize = 3_000;

/// Kind of legal concern a session is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseCategory {
    /// Violence against women and children, abuse at home
    DomesticViolence,
    /// Wages, dismissal, workplace rights
    Labor,
    /// Land, housing, eviction, tenancy
    Property,
    /// Marriage, annulment, custody, support
    Family,
    /// Arrest, complaints, being accused of a crime
    Criminal,
    /// Scams, defective goods, debt collection
    Consumer,
    /// Anything else
    General,
}

impl CaseCategory {
    /// Parse a category label, defaulting to [`CaseCategory::General`]
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "domestic_violence" | "vawc" | "abuse" => CaseCategory::DomesticViolence,
            "labor" | "labour" | "employment" => CaseCategory::Labor,
            "property" | "land" | "housing" => CaseCategory::Property,
            "family" => CaseCategory::Family,
            "criminal" => CaseCategory::Criminal,
            "consumer" | "debt" => CaseCategory::Consumer,
            _ => CaseCategory::General,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            CaseCategory::DomesticViolence => "domestic violence / VAWC",
            CaseCategory::Labor => "labor and employment",
            CaseCategory::Property => "land and property",
            CaseCategory::Family => "family relations",
            CaseCategory::Criminal => "criminal",
            CaseCategory::Consumer => "consumer protection",
            CaseCategory::General => "general legal concern",
        }
    }

    /// Laws the model should consider first
    fn focus(&self) -> &'static str {
        match self {
            CaseCategory::DomesticViolence => {
                "RA 9262 (Anti-VAWC Act), barangay and court protection orders"
            }
            CaseCategory::Labor => "the Labor Code, DOLE and NLRC remedies, SEnA conciliation",
            CaseCategory::Property => "the Civil Code on property and lease, RA 9653 (Rent Control Act)",
            CaseCategory::Family => "the Family Code, support and custody rules",
            CaseCategory::Criminal => "the Revised Penal Code, rights under arrest, the PAO's role",
            CaseCategory::Consumer => "RA 7394 (Consumer Act), DTI complaints, fair debt collection",
            CaseCategory::General => "the Katarungang Pambarangay process and free legal aid",
        }
    }
}

impl std::fmt::Display for CaseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

const PERSONA: &str = "You are Payo, a legal-information assistant for people in the Philippines. \
You explain Philippine law in simple Taglish, you are kind and never judgmental, and you remind \
users that you give legal information, not legal advice. Always point people to free help such as \
the Public Attorney's Office (PAO) when they need a lawyer.";

const ANALYSIS_SHAPE: &str = r#"Respond with a single JSON object and nothing else, using exactly these keys:
{
  "situation": "short plain-language summary of the user's situation",
  "relevantLaws": ["law or rule that may apply"],
  "recommendedSteps": ["concrete step the user can take"],
  "watchOutFor": ["risk, deadline or mistake to avoid"],
  "contacts": {"office name": "phone number"},
  "nextAction": {"step": "the single most important next step", "timeline": "when to do it"}
}"#;

/// System instruction for structured analysis
pub fn analysis_system_prompt() -> String {
    format!("{}\n\n{}", PERSONA, ANALYSIS_SHAPE)
}

/// System instruction for conversational replies
pub fn reply_system_prompt() -> String {
    format!(
        "{}\n\nYou are speaking on a live voice call. Answer in two or three short sentences, \
         in the same language mix the caller uses. Do not use lists or markdown.",
        PERSONA
    )
}

/// Prompt for an end-of-session summary over the full conversation
pub fn summary_prompt(full_text: &str, category: CaseCategory) -> String {
    format!(
        "Category: {}\nConsider especially: {}\n\n\
         Summarize this completed consultation. Cover everything the caller shared and give \
         complete recommendations.\n\nConversation:\n{}",
        category,
        category.focus(),
        tail(full_text, SUMMARY_MAX_CHARS)
    )
}

/// Prompt for a quick analysis while the call is still going
pub fn analysis_prompt(transcript: &str, category: CaseCategory) -> String {
    format!(
        "Category: {}\nConsider especially: {}\n\n\
         The call is still in progress. Give a brief analysis of what has been said so far.\n\n\
         Transcript so far:\n{}",
        category,
        category.focus(),
        tail(transcript, ANALYSIS_MAX_CHARS)
    )
}

/// Prompt for a conversational reply
pub fn reply_prompt(message: &str, context: &str) -> String {
    let context = tail(context, REPLY_CONTEXT_MAX_CHARS).trim();
    if context.is_empty() {
        format!("Caller: {}", message.trim())
    } else {
        format!(
            "Conversation so far:\n{}\n\nCaller: {}",
            context,
            message.trim()
        )
    }
}

/// The last `max_chars` characters of `text`
///
/// Recent turns matter most, so long conversations lose their beginning.
pub fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    match text.char_indices().nth(count - max_chars) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!(CaseCategory::parse("VAWC"), CaseCategory::DomesticViolence);
        assert_eq!(
            CaseCategory::parse("domestic-violence"),
            CaseCategory::DomesticViolence
        );
        assert_eq!(CaseCategory::parse(" Labor "), CaseCategory::Labor);
        assert_eq!(CaseCategory::parse("something else"), CaseCategory::General);
    }

    #[test]
    fn test_tail_keeps_recent_text() {
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("abc", 10), "abc");
        // Multi-byte characters are never split
        assert_eq!(tail("ñañaña", 2), "ña");
    }

    #[test]
    fn test_summary_prompt_mentions_category() {
        let prompt = summary_prompt("Caller: Hindi ako binayaran.", CaseCategory::Labor);
        assert!(prompt.contains("labor and employment"));
        assert!(prompt.contains("Hindi ako binayaran."));
    }

    #[test]
    fn test_reply_prompt_without_context() {
        assert_eq!(reply_prompt(" Hello po ", "  "), "Caller: Hello po");
    }

    #[test]
    fn test_analysis_system_prompt_names_all_keys() {
        let prompt = analysis_system_prompt();
        for key in [
            "situation",
            "relevantLaws",
            "recommendedSteps",
            "watchOutFor",
            "contacts",
            "nextAction",
        ] {
            assert!(prompt.contains(key), "missing {}", key);
        }
    }
}

// Output formatting and styling

use colored::Colorize;
use payo_legal::AnalysisResult;
use payo_providers::ProviderStatus;

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    /// Plain output, for pipes and tests
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format header
    pub fn header(&self, title: &str) -> String {
        if self.use_colors {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Render an analysis for reading in a terminal
    pub fn analysis(&self, result: &AnalysisResult) -> String {
        let mut out = String::new();
        out.push_str(&self.header("Situation"));
        out.push_str(&format!("\n  {}\n", result.situation));

        let sections = [
            ("Relevant laws", &result.relevant_laws),
            ("Recommended steps", &result.recommended_steps),
            ("Watch out for", &result.watch_out_for),
        ];
        for (title, items) in sections {
            if items.is_empty() {
                continue;
            }
            out.push('\n');
            out.push_str(&self.header(title));
            out.push('\n');
            for (i, item) in items.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, item));
            }
        }

        if !result.contacts.is_empty() {
            out.push('\n');
            out.push_str(&self.header("Contacts"));
            out.push('\n');
            for (name, number) in &result.contacts {
                out.push_str(&format!("  {}: {}\n", name, number));
            }
        }

        out.push('\n');
        out.push_str(&self.success(&format!("Next: {}", result.next_action)));
        out.push('\n');
        out
    }

    /// Render one provider status row
    pub fn status_row(&self, status: &ProviderStatus) -> String {
        let state = if !status.enabled {
            "not configured".to_string()
        } else if status.available {
            "available".to_string()
        } else {
            let secs = status.cooldown_remaining_ms.unwrap_or(0).div_ceil(1000);
            format!("cooling down ({}s left)", secs)
        };

        let line = format!(
            "[{}] {} ({}): {}",
            status.priority, status.display_name, status.key, state
        );
        let mut row = match (status.enabled, status.available) {
            (true, true) => self.success(&line),
            (true, false) => self.warning(&line),
            (false, _) => self.error(&line),
        };
        if let Some(last_error) = &status.last_error {
            row.push_str(&format!("\n    last error: {}", last_error));
        }
        row
    }
}

/// Print error message
pub fn print_error(msg: &str) {
    let style = OutputStyle::default();
    eprintln!("{}", style.error(msg));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(enabled: bool, available: bool) -> ProviderStatus {
        ProviderStatus {
            key: "groq".to_string(),
            display_name: "Groq".to_string(),
            enabled,
            available,
            priority: 1,
            last_error: None,
            cooldown_remaining_ms: (!available).then_some(59_001),
        }
    }

    #[test]
    fn test_status_rows() {
        let style = OutputStyle::plain();
        assert_eq!(
            style.status_row(&status(true, true)),
            "✓ [1] Groq (groq): available"
        );
        assert_eq!(
            style.status_row(&status(true, false)),
            "⚠ [1] Groq (groq): cooling down (60s left)"
        );
        assert!(style
            .status_row(&status(false, true))
            .contains("not configured"));
    }

    #[test]
    fn test_status_row_shows_last_error() {
        let mut row = status(true, false);
        row.last_error = Some("API error (429): Rate limit reached".to_string());
        assert!(OutputStyle::plain()
            .status_row(&row)
            .ends_with("last error: API error (429): Rate limit reached"));
    }

    #[test]
    fn test_analysis_rendering() {
        let rendered = OutputStyle::plain().analysis(&AnalysisResult::fallback());
        assert!(rendered.starts_with("Situation\n"));
        assert!(rendered.contains("Contacts"));
        assert!(rendered.contains("(02) 8929-9436"));
        assert!(rendered.contains("✓ Next: Contact the Public Attorney's Office"));
        // Empty sections are skipped
        assert!(!rendered.contains("Relevant laws"));
    }
}

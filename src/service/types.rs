//! Reply shape of the correction service.
//!
//! The service is asked for structured output matching [`response_schema`];
//! the reply's `message.content` is parsed into [`CorrectionReport`].

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GrammarStrength
// ---------------------------------------------------------------------------

/// How sound the original text's grammar was, as judged by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammarStrength {
    /// The original was nearly unreadable.
    Incomprehensible,
    /// Meaningful fixes were needed.
    Moderate,
    /// Hardly any changes were needed.
    Minor,
}

impl std::fmt::Display for GrammarStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            GrammarStrength::Incomprehensible => "incomprehensible",
            GrammarStrength::Moderate => "moderate",
            GrammarStrength::Minor => "minor",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// CorrectionReport
// ---------------------------------------------------------------------------

/// Validated correction produced by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionReport {
    /// Grammar rank of the *original* text.
    pub strength: GrammarStrength,
    /// The corrected text. Usable only when non-empty after trimming.
    pub corrected_text: String,
    /// Brief summary of the changes made.
    pub summary: String,
    /// One word describing the detected tone (friendly, casual, …).
    pub tone: String,
}

impl CorrectionReport {
    /// Whether the report carries text worth applying.
    ///
    /// A successful HTTP exchange can still yield an empty correction; such
    /// a run completes degraded and leaves the clipboard untouched.
    pub fn is_usable(&self) -> bool {
        !self.corrected_text.trim().is_empty()
    }
}

/// JSON schema sent as the `format` field of the chat request, constraining
/// the model's reply to the [`CorrectionReport`] shape.
pub fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "strength": {
                "type": "string",
                "enum": ["incomprehensible", "moderate", "minor"]
            },
            "corrected_text": { "type": "string" },
            "summary": { "type": "string" },
            "tone": { "type": "string" }
        },
        "required": ["strength", "corrected_text", "summary", "tone"]
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_parses_from_service_json() {
        let raw = r#"{
            "strength": "moderate",
            "corrected_text": "They're going to the store.",
            "summary": "Fixed homophone.",
            "tone": "neutral"
        }"#;

        let report: CorrectionReport = serde_json::from_str(raw).expect("parse");
        assert_eq!(report.strength, GrammarStrength::Moderate);
        assert_eq!(report.corrected_text, "They're going to the store.");
        assert!(report.is_usable());
    }

    #[test]
    fn unknown_strength_is_rejected() {
        let raw = r#"{
            "strength": "4",
            "corrected_text": "x",
            "summary": "",
            "tone": ""
        }"#;

        assert!(serde_json::from_str::<CorrectionReport>(raw).is_err());
    }

    #[test]
    fn blank_correction_is_not_usable() {
        let report = CorrectionReport {
            strength: GrammarStrength::Minor,
            corrected_text: "   ".into(),
            summary: "no changes".into(),
            tone: "neutral".into(),
        };
        assert!(!report.is_usable());
    }

    #[test]
    fn schema_lists_every_field_as_required() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .expect("required array")
            .iter()
            .filter_map(|v| v.as_str())
            .collect();

        assert_eq!(
            required,
            vec!["strength", "corrected_text", "summary", "tone"]
        );
        assert_eq!(
            schema["properties"]["strength"]["enum"][1],
            serde_json::json!("moderate")
        );
    }

    #[test]
    fn strength_display_matches_wire_values() {
        assert_eq!(GrammarStrength::Incomprehensible.to_string(), "incomprehensible");
        assert_eq!(GrammarStrength::Moderate.to_string(), "moderate");
        assert_eq!(GrammarStrength::Minor.to_string(), "minor");
    }
}

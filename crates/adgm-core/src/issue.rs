//! # Compliance Issues
//!
//! The unit of output of a document review: one red flag raised by the
//! language model, with the snippet of the document it refers to and a
//! suggested correction.
//!
//! Model output is free text that is *instructed* to be a JSON array. The
//! array is recovered by taking the span from the first `[` to the last `]`
//! and parsing it; anything around it (prose, code fences) is ignored.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ExtractError;

/// Severity of a compliance issue as reported by the model.
///
/// Parsing is case-insensitive and lenient: anything that is not one of the
/// three known levels maps to [`Severity::Unknown`] rather than failing the
/// whole issue array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Severity {
    /// Returns the canonical label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a severity label, ignoring case and surrounding whitespace.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Severity::parse_lenient).unwrap_or_default())
    }
}

/// Explicit `null` reads as an empty string.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single red flag raised against a document.
///
/// Missing and `null` text fields read as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplianceIssue {
    /// Short description of the problem.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub issue: String,
    /// Clause or section reference, e.g. `Clause 3.1`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub section: String,
    /// Exact text from the document the issue refers to. Used to place the
    /// annotation in the reviewed copy.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub relevant_text: String,
    #[serde(default)]
    pub severity: Severity,
    /// Suggested correction.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub suggestion: String,
}

impl ComplianceIssue {
    /// The snippet used for annotation, trimmed. `None` when blank.
    pub fn anchor_text(&self) -> Option<&str> {
        let trimmed = self.relevant_text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Recover the issue array from raw model output.
///
/// Takes everything from the first `[` to the last `]` (inclusive) and
/// parses it as a JSON array of [`ComplianceIssue`]. An empty array is a
/// valid answer meaning "no issues found".
pub fn extract_issues(raw_output: &str) -> Result<Vec<ComplianceIssue>, ExtractError> {
    let start = raw_output.find('[').ok_or(ExtractError::NoJsonArray)?;
    let end = raw_output.rfind(']').ok_or(ExtractError::NoJsonArray)?;
    if end < start {
        return Err(ExtractError::NoJsonArray);
    }
    serde_json::from_str(&raw_output[start..=end]).map_err(ExtractError::InvalidJson)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_array_wrapped_in_prose_and_fences() {
        let raw = r#"Here is the review:
```json
[
  {
    "issue": "Jurisdiction clause does not specify ADGM",
    "section": "Clause 3.1",
    "relevant_text": "governed by the laws of the UAE Federal Courts",
    "severity": "High",
    "suggestion": "Update jurisdiction to ADGM Courts."
  }
]
```
Let me know if you need anything else."#;

        let issues = extract_issues(raw).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].section, "Clause 3.1");
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn empty_array_means_no_issues() {
        let issues = extract_issues("JSON Output:\n[]").unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn missing_array_is_reported() {
        let err = extract_issues("I could not review this document.").unwrap_err();
        assert!(matches!(err, ExtractError::NoJsonArray));
    }

    #[test]
    fn closing_bracket_before_opening_is_not_an_array() {
        let err = extract_issues("] nothing here [").unwrap_err();
        assert!(matches!(err, ExtractError::NoJsonArray));
    }

    #[test]
    fn malformed_array_is_invalid_json() {
        let err = extract_issues(r#"[{"issue": "x",}]"#).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidJson(_)));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let issues = extract_issues(r#"[{"issue": "Missing signatory block"}]"#).unwrap();
        assert_eq!(issues[0].issue, "Missing signatory block");
        assert_eq!(issues[0].relevant_text, "");
        assert_eq!(issues[0].severity, Severity::Unknown);
        assert!(issues[0].anchor_text().is_none());
    }

    #[test]
    fn severity_is_parsed_leniently() {
        let issues = extract_issues(
            r#"[{"severity": "medium"}, {"severity": " LOW "}, {"severity": "urgent"}, {"severity": null}]"#,
        )
        .unwrap();
        let levels: Vec<_> = issues.iter().map(|i| i.severity).collect();
        assert_eq!(
            levels,
            vec![Severity::Medium, Severity::Low, Severity::Unknown, Severity::Unknown]
        );
    }

    #[test]
    fn null_fields_read_as_empty_and_keep_the_array() {
        let raw = r#"[
            {"issue": "Missing signatory block", "section": null, "relevant_text": null,
             "severity": "Medium", "suggestion": null},
            {"issue": "Wrong courts", "section": "3.1", "relevant_text": "UAE Federal Courts",
             "severity": "High", "suggestion": "Refer to ADGM Courts."}
        ]"#;
        let issues = extract_issues(raw).unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].section, "");
        assert_eq!(issues[0].suggestion, "");
        assert!(issues[0].anchor_text().is_none());
        assert_eq!(issues[1].section, "3.1");
        assert_eq!(issues[1].anchor_text(), Some("UAE Federal Courts"));
    }

    #[test]
    fn only_the_three_levels_are_recognised() {
        for label in ["critical", "moderate", "minor"] {
            assert_eq!(Severity::parse_lenient(label), Severity::Unknown);
        }
        assert_eq!(Severity::parse_lenient("HIGH"), Severity::High);
    }

    #[test]
    fn severity_serializes_as_label() {
        let json = serde_json::to_string(&Severity::High).unwrap();
        assert_eq!(json, "\"High\"");
    }

    #[test]
    fn anchor_text_is_trimmed() {
        let issue = ComplianceIssue {
            relevant_text: "  UAE Federal Courts \n".into(),
            ..Default::default()
        };
        assert_eq!(issue.anchor_text(), Some("UAE Federal Courts"));
    }
}

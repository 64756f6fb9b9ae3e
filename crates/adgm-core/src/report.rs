//! # Review Report
//!
//! The structured JSON report produced at the end of a review. Key names
//! (`documents_uploaded`, `missing_document`, `issues_found`, ...) are the
//! report format consumed downstream and must not change.

use serde::{Deserialize, Serialize};

use crate::checklist::{ChecklistResult, LegalProcess};
use crate::error::CoreError;
use crate::issue::ComplianceIssue;

/// File name offered for the JSON report download.
pub const REPORT_FILE_NAME: &str = "adgm_analysis_report.json";

/// Review outcome for one uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReview {
    /// Uploaded file name.
    pub document: String,
    /// Issues raised by the model. Empty when none were found or the
    /// analysis failed.
    pub issues: Vec<ComplianceIssue>,
    /// Why the analysis failed, if it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentReview {
    /// A successful review.
    pub fn with_issues(document: impl Into<String>, issues: Vec<ComplianceIssue>) -> Self {
        Self {
            document: document.into(),
            issues,
            error: None,
        }
    }

    /// A failed review; carries no issues.
    pub fn failed(document: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            issues: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Aggregate report over every uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewReport {
    /// Process the checklist was evaluated for.
    pub process: LegalProcess,
    /// Process detected from the uploaded file names.
    pub detected_process: LegalProcess,
    pub documents_uploaded: usize,
    pub required_documents: usize,
    /// Comma-separated missing documents, or `"None"`.
    pub missing_document: String,
    pub issues_found: Vec<DocumentReview>,
}

impl ReviewReport {
    /// Assemble a report from the checklist outcome and per-document reviews.
    pub fn new(
        checklist: &ChecklistResult,
        detected_process: LegalProcess,
        issues_found: Vec<DocumentReview>,
    ) -> Self {
        Self {
            process: LegalProcess::CompanyIncorporation,
            detected_process,
            documents_uploaded: checklist.uploaded,
            required_documents: checklist.required_total,
            missing_document: checklist.missing_display(),
            issues_found,
        }
    }

    /// Total number of issues across all documents.
    pub fn total_issues(&self) -> usize {
        self.issues_found.iter().map(|d| d.issues.len()).sum()
    }

    /// Render the report as pretty-printed JSON with a 4-space indent.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, CoreError> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::check_missing_documents;
    use crate::issue::Severity;

    fn sample_issue() -> ComplianceIssue {
        ComplianceIssue {
            issue: "Jurisdiction clause does not specify ADGM".into(),
            section: "Clause 3.1".into(),
            relevant_text: "UAE Federal Courts".into(),
            severity: Severity::High,
            suggestion: "Update jurisdiction to ADGM Courts.".into(),
        }
    }

    #[test]
    fn report_uses_contract_key_names() {
        let checklist = check_missing_documents(&["Articles of Association.docx"]);
        let report = ReviewReport::new(
            &checklist,
            LegalProcess::Unknown,
            vec![DocumentReview::with_issues(
                "Articles of Association.docx",
                vec![sample_issue()],
            )],
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["process"], "Company Incorporation");
        assert_eq!(value["detected_process"], "Unknown");
        assert_eq!(value["documents_uploaded"], 1);
        assert_eq!(value["required_documents"], 5);
        assert_eq!(
            value["missing_document"],
            "Memorandum of Association, Board Resolution Templates, UBO Declaration Form, Register of Members and Directors"
        );
        let doc = &value["issues_found"][0];
        assert_eq!(doc["document"], "Articles of Association.docx");
        assert_eq!(doc["issues"][0]["severity"], "High");
        assert!(doc.get("error").is_none());
    }

    #[test]
    fn failed_review_serializes_error_and_no_issues() {
        let review = DocumentReview::failed("broken.docx", "no JSON array found in model output");
        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["issues"].as_array().unwrap().len(), 0);
        assert_eq!(value["error"], "no JSON array found in model output");
    }

    #[test]
    fn pretty_json_uses_four_space_indent() {
        let checklist = check_missing_documents::<&str>(&[]);
        let report = ReviewReport::new(&checklist, LegalProcess::Unknown, Vec::new());
        let text = String::from_utf8(report.to_pretty_json().unwrap()).unwrap();
        assert!(text.contains("\n    \"process\": \"Company Incorporation\""));
    }

    #[test]
    fn total_issues_sums_documents() {
        let checklist = check_missing_documents::<&str>(&[]);
        let report = ReviewReport::new(
            &checklist,
            LegalProcess::CompanyIncorporation,
            vec![
                DocumentReview::with_issues("a.docx", vec![sample_issue(), sample_issue()]),
                DocumentReview::failed("b.docx", "parse error"),
                DocumentReview::with_issues("c.docx", vec![sample_issue()]),
            ],
        );
        assert_eq!(report.total_issues(), 3);
    }
}

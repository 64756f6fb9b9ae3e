//! # Submission Checklist
//!
//! Completeness check for an ADGM submission and keyword-based detection of
//! the legal process the uploaded documents belong to.
//!
//! Only the Company Incorporation checklist is defined. A required document
//! counts as uploaded when its name appears, case-insensitively, anywhere in
//! an uploaded file name (`Articles of Association (signed).docx` satisfies
//! `Articles of Association`).

use serde::{Deserialize, Serialize};

/// Documents required for a Company Incorporation submission, in report order.
pub const INCORPORATION_CHECKLIST: [&str; 5] = [
    "Articles of Association",
    "Memorandum of Association",
    "Board Resolution Templates",
    "UBO Declaration Form",
    "Register of Members and Directors",
];

/// The legal process a set of uploads appears to belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalProcess {
    #[serde(rename = "Company Incorporation")]
    CompanyIncorporation,
    #[serde(rename = "Employment HR")]
    EmploymentHr,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl LegalProcess {
    /// Human-readable label, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyIncorporation => "Company Incorporation",
            Self::EmploymentHr => "Employment HR",
            Self::Unknown => "Unknown",
        }
    }

    /// Detect the process from uploaded file names.
    ///
    /// Incorporation keywords (`incorporation`, `moa`) take precedence over
    /// employment keywords.
    pub fn identify<S: AsRef<str>>(file_names: &[S]) -> Self {
        let lowered: Vec<String> = file_names
            .iter()
            .map(|n| n.as_ref().to_lowercase())
            .collect();

        if lowered
            .iter()
            .any(|n| n.contains("incorporation") || n.contains("moa"))
        {
            Self::CompanyIncorporation
        } else if lowered.iter().any(|n| n.contains("employment")) {
            Self::EmploymentHr
        } else {
            Self::Unknown
        }
    }
}

impl std::fmt::Display for LegalProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of checking uploads against the incorporation checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistResult {
    /// Required documents not found among the uploads, in checklist order.
    pub missing: Vec<String>,
    /// Number of documents the checklist requires.
    pub required_total: usize,
    /// Number of files uploaded.
    pub uploaded: usize,
}

impl ChecklistResult {
    /// True when every required document was found.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Missing documents joined with `", "`, or `"None"` when complete.
    pub fn missing_display(&self) -> String {
        if self.missing.is_empty() {
            "None".to_string()
        } else {
            self.missing.join(", ")
        }
    }
}

/// Check uploaded file names against [`INCORPORATION_CHECKLIST`].
pub fn check_missing_documents<S: AsRef<str>>(file_names: &[S]) -> ChecklistResult {
    let lowered: Vec<String> = file_names
        .iter()
        .map(|n| n.as_ref().to_lowercase())
        .collect();

    let missing = INCORPORATION_CHECKLIST
        .iter()
        .filter(|required| {
            let needle = required.to_lowercase();
            !lowered.iter().any(|name| name.contains(&needle))
        })
        .map(|required| required.to_string())
        .collect();

    ChecklistResult {
        missing,
        required_total: INCORPORATION_CHECKLIST.len(),
        uploaded: file_names.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn four_of_five_uploaded_reports_register_missing() {
        let uploads = [
            "Articles of Association.docx",
            "Memorandum of Association.docx",
            "UBO Declaration Form.docx",
            "Board Resolution Templates.docx",
        ];
        let result = check_missing_documents(&uploads);

        assert_eq!(result.required_total, 5);
        assert_eq!(result.uploaded, 4);
        assert_eq!(result.missing, vec!["Register of Members and Directors"]);
        assert!(!result.is_complete());
        assert_eq!(result.missing_display(), "Register of Members and Directors");
    }

    #[test]
    fn matching_ignores_case_and_surrounding_text() {
        let uploads = [
            "final_ARTICLES OF ASSOCIATION_v2.docx",
            "memorandum of association (signed).docx",
            "Board Resolution Templates.docx",
            "ubo declaration form.docx",
            "Register of Members and Directors - 2024.docx",
        ];
        let result = check_missing_documents(&uploads);
        assert!(result.is_complete());
        assert_eq!(result.missing_display(), "None");
    }

    #[test]
    fn no_uploads_misses_everything_in_order() {
        let result = check_missing_documents::<&str>(&[]);
        assert_eq!(result.missing, INCORPORATION_CHECKLIST.to_vec());
        assert_eq!(
            result.missing_display(),
            "Articles of Association, Memorandum of Association, Board Resolution Templates, \
             UBO Declaration Form, Register of Members and Directors"
        );
    }

    #[test]
    fn incorporation_keywords_take_precedence() {
        let names = ["Employment Contract.docx", "Company_MoA.docx"];
        assert_eq!(
            LegalProcess::identify(&names),
            LegalProcess::CompanyIncorporation
        );
    }

    #[test]
    fn employment_detected_without_incorporation_keywords() {
        let names = ["Standard Employment Contract.docx"];
        assert_eq!(LegalProcess::identify(&names), LegalProcess::EmploymentHr);
    }

    #[test]
    fn unrelated_names_are_unknown() {
        let names = ["notes.docx"];
        assert_eq!(LegalProcess::identify(&names), LegalProcess::Unknown);
    }

    #[test]
    fn process_serializes_as_label() {
        let json = serde_json::to_string(&LegalProcess::EmploymentHr).unwrap();
        assert_eq!(json, "\"Employment HR\"");
    }

    proptest! {
        #[test]
        fn missing_never_exceeds_required(names in proptest::collection::vec("[a-zA-Z ]{0,40}", 0..8)) {
            let result = check_missing_documents(&names);
            prop_assert!(result.missing.len() <= result.required_total);
            prop_assert_eq!(result.uploaded, names.len());
        }

        #[test]
        fn adding_every_required_name_completes(extra in proptest::collection::vec("[a-z0-9_]{0,12}", 0..4)) {
            let mut names: Vec<String> = INCORPORATION_CHECKLIST
                .iter()
                .map(|d| format!("{d}.docx"))
                .collect();
            names.extend(extra);
            prop_assert!(check_missing_documents(&names).is_complete());
        }
    }
}

//! # Review Pipeline
//!
//! ```text
//! uploads ─> validate ─> checklist ─┬─ incomplete, no proceed ─> Halted
//!                                   └─ otherwise ─> analyse each document in
//!                                                   upload order ─> report
//!                                                   ─> annotated copies
//! ```
//!
//! Documents are analysed one after another. A document that cannot be
//! parsed or analysed is recorded in the report with its error and gets no
//! annotated copy; the rest of the review continues.

use adgm_core::{
    check_missing_documents, ChecklistResult, DocumentReview, LegalProcess, ReviewReport,
};
use adgm_docx::{annotate, is_docx_name, reviewed_file_name, DocxPackage};
use serde::Serialize;

use crate::analysis::Analyzer;
use crate::error::ReviewError;

/// One uploaded file.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// The annotated copy of one uploaded document.
#[derive(Debug, Clone)]
pub struct ReviewedDocument {
    /// Name of the upload this copy was made from.
    pub source_name: String,
    /// `reviewed_{source_name}`.
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Issues placed in the document.
    pub annotations: usize,
    /// Issue anchors that were not found in the document text.
    pub unplaced: Vec<String>,
}

/// Checklist status of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistStatus {
    pub process: LegalProcess,
    pub detected_process: LegalProcess,
    pub documents_uploaded: usize,
    pub required_documents: usize,
    pub missing_documents: Vec<String>,
    pub complete: bool,
}

impl ChecklistStatus {
    pub fn evaluate<S: AsRef<str>>(file_names: &[S]) -> Self {
        let checklist = check_missing_documents(file_names);
        Self::from_parts(&checklist, LegalProcess::identify(file_names))
    }

    fn from_parts(checklist: &ChecklistResult, detected_process: LegalProcess) -> Self {
        Self {
            process: LegalProcess::CompanyIncorporation,
            detected_process,
            documents_uploaded: checklist.uploaded,
            required_documents: checklist.required_total,
            missing_documents: checklist.missing.clone(),
            complete: checklist.is_complete(),
        }
    }
}

/// A finished review.
#[derive(Debug, Clone)]
pub struct CompletedReview {
    pub report: ReviewReport,
    pub reviewed_documents: Vec<ReviewedDocument>,
}

/// Result of running the pipeline.
#[derive(Debug, Clone)]
pub enum ReviewOutcome {
    /// Required documents are missing and the caller did not ask to proceed.
    Halted(ChecklistStatus),
    Completed(CompletedReview),
}

/// Runs reviews end to end.
#[derive(Debug, Clone)]
pub struct ReviewPipeline {
    analyzer: Analyzer,
}

impl ReviewPipeline {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Review `documents`. With an incomplete checklist the review stops
    /// unless `proceed` is set.
    pub async fn run(
        &self,
        documents: &[UploadedDocument],
        proceed: bool,
    ) -> Result<ReviewOutcome, ReviewError> {
        validate_uploads(documents)?;

        let names: Vec<&str> = documents.iter().map(|d| d.name.as_str()).collect();
        let checklist = check_missing_documents(&names);
        let detected_process = LegalProcess::identify(&names);
        tracing::info!(
            uploaded = checklist.uploaded,
            missing = checklist.missing.len(),
            process = %detected_process,
            "checklist evaluated"
        );

        if !checklist.is_complete() && !proceed {
            return Ok(ReviewOutcome::Halted(ChecklistStatus::from_parts(
                &checklist,
                detected_process,
            )));
        }

        let mut reviews = Vec::with_capacity(documents.len());
        let mut reviewed_documents = Vec::with_capacity(documents.len());
        for document in documents {
            let (review, reviewed) = self.review_one(document).await;
            reviews.push(review);
            reviewed_documents.extend(reviewed);
        }

        let report = ReviewReport::new(&checklist, detected_process, reviews);
        tracing::info!(
            documents = report.issues_found.len(),
            issues = report.total_issues(),
            "review complete"
        );
        Ok(ReviewOutcome::Completed(CompletedReview {
            report,
            reviewed_documents,
        }))
    }

    async fn review_one(
        &self,
        document: &UploadedDocument,
    ) -> (DocumentReview, Option<ReviewedDocument>) {
        let name = document.name.as_str();
        let package = match DocxPackage::from_bytes(&document.bytes) {
            Ok(package) => package,
            Err(e) => {
                tracing::warn!(document = name, error = %e, "could not open document");
                return (DocumentReview::failed(name, e.to_string()), None);
            }
        };
        let content = match package.body_text() {
            Ok(text) if text.trim().is_empty() => {
                return (
                    DocumentReview::failed(name, "document contains no body text"),
                    Some(unchanged_copy(document)),
                )
            }
            Ok(text) => text,
            Err(e) => return (DocumentReview::failed(name, e.to_string()), None),
        };

        let review = self.analyzer.review_document(name, &content).await;
        if review.error.is_some() {
            return (review, Some(unchanged_copy(document)));
        }

        let reviewed = match annotate(&package, &review.issues) {
            Ok(annotated) => {
                if !annotated.unplaced.is_empty() {
                    tracing::debug!(
                        document = name,
                        unplaced = annotated.unplaced.len(),
                        "some issues could not be located in the document"
                    );
                }
                Some(ReviewedDocument {
                    source_name: name.to_string(),
                    file_name: reviewed_file_name(name),
                    bytes: annotated.bytes,
                    annotations: annotated.placed,
                    unplaced: annotated.unplaced,
                })
            }
            Err(e) => {
                tracing::warn!(document = name, error = %e, "annotation failed");
                Some(unchanged_copy(document))
            }
        };
        (review, reviewed)
    }
}

/// The upload as its `reviewed_` copy, with no annotations.
fn unchanged_copy(document: &UploadedDocument) -> ReviewedDocument {
    ReviewedDocument {
        source_name: document.name.clone(),
        file_name: reviewed_file_name(&document.name),
        bytes: document.bytes.clone(),
        annotations: 0,
        unplaced: Vec::new(),
    }
}

/// Reject empty submissions, non-`.docx` files and duplicate names.
pub fn validate_uploads(documents: &[UploadedDocument]) -> Result<(), ReviewError> {
    if documents.is_empty() {
        return Err(ReviewError::NoDocuments);
    }
    let mut seen = std::collections::HashSet::new();
    for document in documents {
        if !is_docx_name(&document.name) {
            return Err(ReviewError::UnsupportedFile(document.name.clone()));
        }
        if !seen.insert(document.name.as_str()) {
            return Err(ReviewError::DuplicateDocument(document.name.clone()));
        }
    }
    Ok(())
}

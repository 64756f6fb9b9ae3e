//! # adgm-core: Domain Types for the ADGM Corporate Agent
//!
//! Shared vocabulary for every other crate in the workspace. It depends on
//! nothing internal.
//!
//! ## Contents
//!
//! - [`issue`]: `Severity`, `ComplianceIssue`, and extraction of the JSON
//!   issue array from free-form model output.
//! - [`checklist`]: the Company Incorporation document checklist and
//!   keyword-based legal process detection.
//! - [`report`]: per-document reviews and the aggregate `ReviewReport`
//!   whose JSON key names are a public contract.
//! - [`digest`]: SHA-256 content digests used to identify knowledge-base
//!   chunks.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `adgm-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod checklist;
pub mod digest;
pub mod error;
pub mod issue;
pub mod report;

pub use checklist::{check_missing_documents, ChecklistResult, LegalProcess, INCORPORATION_CHECKLIST};
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CoreError, ExtractError};
pub use issue::{extract_issues, ComplianceIssue, Severity};
pub use report::{DocumentReview, ReviewReport, REPORT_FILE_NAME};

//! # Checklist Route
//!
//! Evaluates a set of file names against the Company Incorporation
//! checklist without uploading anything.

use adgm_agent::ChecklistStatus;
use adgm_core::LegalProcess;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/checklist", post(evaluate_checklist))
}

/// File names to evaluate.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChecklistRequest {
    pub file_names: Vec<String>,
}

impl Validate for ChecklistRequest {
    fn validate(&self) -> Result<(), String> {
        if self.file_names.iter().any(|n| n.trim().is_empty()) {
            return Err("file names must not be blank".into());
        }
        Ok(())
    }
}

/// Checklist outcome for the submitted names.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChecklistResponse {
    /// Process the checklist was evaluated for.
    pub process: String,
    /// Process detected from the file names.
    pub detected_process: String,
    pub documents_uploaded: usize,
    pub required_documents: usize,
    pub missing_documents: Vec<String>,
    pub complete: bool,
}

impl From<ChecklistStatus> for ChecklistResponse {
    fn from(status: ChecklistStatus) -> Self {
        Self {
            process: process_label(status.process),
            detected_process: process_label(status.detected_process),
            documents_uploaded: status.documents_uploaded,
            required_documents: status.required_documents,
            missing_documents: status.missing_documents,
            complete: status.complete,
        }
    }
}

fn process_label(process: LegalProcess) -> String {
    process.as_str().to_string()
}

/// POST /v1/checklist: Evaluate file names against the checklist.
#[utoipa::path(
    post,
    path = "/v1/checklist",
    request_body = ChecklistRequest,
    responses(
        (status = 200, description = "Checklist result", body = ChecklistResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 422, description = "Blank file name", body = crate::error::ErrorBody),
    ),
    tag = "checklist"
)]
pub(crate) async fn evaluate_checklist(
    body: Result<Json<ChecklistRequest>, JsonRejection>,
) -> Result<Json<ChecklistResponse>, AppError> {
    let req = extract_validated_json(body)?;
    Ok(Json(ChecklistStatus::evaluate(&req.file_names).into()))
}

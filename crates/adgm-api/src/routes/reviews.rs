//! # Review Routes
//!
//! `POST /v1/reviews` accepts `multipart/form-data` with one file part per
//! `.docx`. Non-file parts are ignored. When required documents are missing
//! the review stops with 409 and the checklist in `error.details`, unless
//! `?proceed=true` is given.
//!
//! Completed reviews are stored in memory and served back as JSON, as the
//! `adgm_analysis_report.json` download, and as annotated `.docx` copies.

use adgm_agent::{ReviewOutcome, UploadedDocument};
use adgm_core::{ReviewReport, REPORT_FILE_NAME};
use adgm_docx::DOCX_MIME;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::checklist::ChecklistResponse;
use crate::state::{AppState, StoredReview};

/// Upper bound on a review request body.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/reviews",
            post(create_review).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/v1/reviews/:id", get(get_review))
        .route("/v1/reviews/:id/report.json", get(download_report))
        .route("/v1/reviews/:id/documents/:name", get(download_document))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReviewParams {
    /// Review even when required documents are missing.
    #[serde(default)]
    pub proceed: bool,
}

/// One annotated copy available for download.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewedDocumentSummary {
    pub source_name: String,
    pub file_name: String,
    pub annotations: usize,
    /// Issue anchors that could not be located in the document.
    pub unplaced: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub report: ReviewReport,
    pub reviewed_documents: Vec<ReviewedDocumentSummary>,
}

impl From<&StoredReview> for ReviewResponse {
    fn from(stored: &StoredReview) -> Self {
        Self {
            id: stored.id,
            created_at: stored.created_at,
            report: (*stored.report).clone(),
            reviewed_documents: stored
                .documents
                .iter()
                .map(|d| ReviewedDocumentSummary {
                    source_name: d.source_name.clone(),
                    file_name: d.file_name.clone(),
                    annotations: d.annotations,
                    unplaced: d.unplaced.clone(),
                })
                .collect(),
        }
    }
}

fn lookup(state: &AppState, id: Uuid) -> Result<StoredReview, AppError> {
    state
        .reviews
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("review {id}")))
}

/// Collect the file parts of a multipart body.
async fn read_uploads(mut multipart: Multipart) -> Result<Vec<UploadedDocument>, AppError> {
    let mut documents = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let Some(name) = field.file_name().map(base_name) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        documents.push(UploadedDocument::new(name, bytes.to_vec()));
    }
    Ok(documents)
}

/// Strip any client-side directory from an uploaded file name.
fn base_name(name: &str) -> String {
    name.rsplit(['/', '\\']).next().unwrap_or(name).trim().to_string()
}

/// `attachment` disposition with a header-safe file name.
fn attachment(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

/// POST /v1/reviews: Upload documents and run a review.
#[utoipa::path(
    post,
    path = "/v1/reviews",
    params(ReviewParams),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "One file part per .docx document"),
    responses(
        (status = 201, description = "Review completed", body = ReviewResponse),
        (status = 409, description = "Required documents missing", body = crate::error::ErrorBody),
        (status = 422, description = "Empty submission, non-.docx file, or duplicate name", body = crate::error::ErrorBody),
        (status = 503, description = "Review model not configured", body = crate::error::ErrorBody),
    ),
    tag = "reviews"
)]
pub(crate) async fn create_review(
    State(state): State<AppState>,
    params: Result<Query<ReviewParams>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let pipeline = state.pipeline.clone().ok_or_else(|| {
        AppError::ServiceUnavailable("review model not configured; set OPENAI_API_KEY".into())
    })?;

    let documents = read_uploads(multipart).await?;
    tracing::info!(
        documents = documents.len(),
        proceed = params.proceed,
        "review requested"
    );

    let review = match pipeline.run(&documents, params.proceed).await? {
        ReviewOutcome::Halted(status) => {
            let missing = status.missing_documents.join(", ");
            let details = serde_json::to_value(ChecklistResponse::from(status))
                .map_err(|e| AppError::Internal(e.to_string()))?;
            return Err(AppError::ChecklistIncomplete { missing, details });
        }
        ReviewOutcome::Completed(review) => review,
    };

    let stored = StoredReview {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        report: Arc::new(review.report),
        documents: Arc::new(review.reviewed_documents),
    };
    state.reviews.insert(stored.id, stored.clone());
    tracing::info!(review_id = %stored.id, "review stored");

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(&stored))))
}

/// GET /v1/reviews/:id: Fetch a stored review.
#[utoipa::path(
    get,
    path = "/v1/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review id")),
    responses(
        (status = 200, description = "Stored review", body = ReviewResponse),
        (status = 404, description = "Unknown review", body = crate::error::ErrorBody),
    ),
    tag = "reviews"
)]
pub(crate) async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewResponse>, AppError> {
    Ok(Json(ReviewResponse::from(&lookup(&state, id)?)))
}

/// GET /v1/reviews/:id/report.json: Download the report.
#[utoipa::path(
    get,
    path = "/v1/reviews/{id}/report.json",
    params(("id" = Uuid, Path, description = "Review id")),
    responses(
        (status = 200, description = "adgm_analysis_report.json", content_type = "application/json"),
        (status = 404, description = "Unknown review", body = crate::error::ErrorBody),
    ),
    tag = "reviews"
)]
pub(crate) async fn download_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let stored = lookup(&state, id)?;
    let bytes = stored
        .report
        .to_pretty_json()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, attachment(REPORT_FILE_NAME)),
        ],
        bytes,
    )
        .into_response())
}

/// GET /v1/reviews/:id/documents/:name: Download an annotated copy.
///
/// `name` may be the uploaded file name or its `reviewed_` name.
#[utoipa::path(
    get,
    path = "/v1/reviews/{id}/documents/{name}",
    params(
        ("id" = Uuid, Path, description = "Review id"),
        ("name" = String, Path, description = "Uploaded or reviewed file name"),
    ),
    responses(
        (status = 200, description = "Annotated .docx", content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        (status = 404, description = "Unknown review or document", body = crate::error::ErrorBody),
    ),
    tag = "reviews"
)]
pub(crate) async fn download_document(
    State(state): State<AppState>,
    Path((id, name)): Path<(Uuid, String)>,
) -> Result<Response, AppError> {
    let stored = lookup(&state, id)?;
    let document = stored
        .document(&name)
        .ok_or_else(|| AppError::NotFound(format!("reviewed document {name}")))?;
    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, attachment(&document.file_name)),
        ],
        document.bytes.clone(),
    )
        .into_response())
}

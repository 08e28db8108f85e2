//! Axum route handlers for the upload form and the analysis API.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::Html,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::extraction::ExtractionResult;
use crate::screening::acquisition::{acquire_text, AcquisitionError, ResumeFormat};
use crate::screening::analyzer::ResumeAnalyzer;
use crate::screening::views::{
    ResumePage, MSG_INVALID_FORMAT, MSG_NO_FILE, MSG_TOO_LARGE, MSG_UNREADABLE_PDF,
};
use crate::state::AppState;

/// Multipart field carrying the resume file.
const UPLOAD_FIELD: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Upload {
    pub filename: String,
    pub bytes: Bytes,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub request_id: Uuid,
    pub filename: String,
    pub format: ResumeFormat,
    pub analyzed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: ExtractionResult,
}

type Screening = Result<(ResumeFormat, ExtractionResult), AcquisitionError>;

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_form() -> Result<Html<String>, AppError> {
    ResumePage::form().into_html()
}

/// POST /pred
///
/// Every request-level problem (no file, wrong extension, unreadable PDF,
/// oversized upload) is reported on the re-rendered form with status 200.
pub async fn handle_predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let request_id = Uuid::new_v4();

    let upload = match read_upload(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            warn!(%request_id, "Upload without a resume file");
            return ResumePage::with_message(MSG_NO_FILE).into_html();
        }
        Err(e) => {
            warn!(%request_id, error = %e, "Unreadable multipart body");
            let message = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                MSG_TOO_LARGE
            } else {
                MSG_NO_FILE
            };
            return ResumePage::with_message(message).into_html();
        }
    };

    match screen_upload(state.analyzer.clone(), upload, request_id).await? {
        Ok((_, result)) => ResumePage::with_result(result).into_html(),
        Err(err) => ResumePage::with_message(rejection_message(&err)).into_html(),
    }
}

/// POST /api/v1/analyze
///
/// Same pipeline as the form, answered as JSON.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let request_id = Uuid::new_v4();

    let upload = read_upload(&mut multipart)
        .await
        .map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(MSG_TOO_LARGE.to_string())
            } else {
                AppError::Validation(format!("Malformed multipart body: {e}"))
            }
        })?
        .ok_or_else(|| AppError::Validation(MSG_NO_FILE.to_string()))?;
    let filename = upload.filename.clone();

    let (format, result) = screen_upload(state.analyzer.clone(), upload, request_id).await??;

    Ok(Json(AnalyzeResponse {
        request_id,
        filename,
        format,
        analyzed_at: Utc::now(),
        result,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Returns the `resume` field, or `None` when it is absent or an empty file
/// input was submitted.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        if filename.is_empty() && bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(Upload { filename, bytes }));
    }
    Ok(None)
}

/// Acquires the text and runs the analyzer on the blocking pool.
/// The outer error is an infrastructure failure; the inner one is a
/// rejected upload.
async fn screen_upload(
    analyzer: Arc<ResumeAnalyzer>,
    upload: Upload,
    request_id: Uuid,
) -> Result<Screening, AppError> {
    let Upload { filename, bytes } = upload;
    info!(%request_id, filename = %filename, size = bytes.len(), "Resume received");

    let screening = tokio::task::spawn_blocking(move || -> Screening {
        let (format, text) = acquire_text(&filename, &bytes)?;
        Ok((format, analyzer.analyze(&text)))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("Screening task failed")))?;

    match &screening {
        Ok((format, result)) => info!(
            %request_id,
            ?format,
            category = %result.category,
            job = %result.job,
            "Resume screened"
        ),
        Err(err) => warn!(%request_id, error = %err, "Resume rejected"),
    }

    Ok(screening)
}

fn rejection_message(err: &AcquisitionError) -> &'static str {
    match err {
        AcquisitionError::UnsupportedFormat(_) => MSG_INVALID_FORMAT,
        AcquisitionError::Pdf(_) => MSG_UNREADABLE_PDF,
    }
}

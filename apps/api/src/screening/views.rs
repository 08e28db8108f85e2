use askama::Template;
use axum::response::Html;

use crate::errors::AppError;
use crate::models::extraction::ExtractionResult;

pub const MSG_NO_FILE: &str = "No resume file uploaded.";
pub const MSG_INVALID_FORMAT: &str = "Invalid file format. Upload PDF or TXT.";
pub const MSG_UNREADABLE_PDF: &str = "Could not read text from the uploaded PDF.";
pub const MSG_TOO_LARGE: &str = "The uploaded file is too large.";

/// Upload form, optionally with a message or an analysis result below it.
#[derive(Template, Default)]
#[template(path = "resume.html")]
pub struct ResumePage {
    pub message: Option<String>,
    pub result: Option<ExtractionResult>,
}

impl ResumePage {
    pub fn form() -> Self {
        Self::default()
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            result: None,
        }
    }

    pub fn with_result(result: ExtractionResult) -> Self {
        Self {
            message: None,
            result: Some(result),
        }
    }

    pub fn into_html(self) -> Result<Html<String>, AppError> {
        let body = self.render().map_err(|e| {
            AppError::Internal(anyhow::Error::new(e).context("Failed to render page"))
        })?;
        Ok(Html(body))
    }
}

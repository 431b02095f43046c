use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::ports::LlmClient;
use crate::application::services::AnalysisError;
use crate::domain::{ContentType, Document};
use crate::presentation::state::AppState;

use super::error::error_response;
use super::upload::find_file_field;

#[tracing::instrument(skip(state, multipart))]
pub async fn summarize_mixed_doc_handler<L>(
    State(state): State<AppState<L>>,
    mut multipart: Multipart,
) -> Response
where
    L: LlmClient + 'static,
{
    let upload = match find_file_field(&mut multipart, "doc").await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            tracing::warn!("Mixed-doc request with no doc part");
            return error_response(StatusCode::BAD_REQUEST, "No file provided");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return error_response(e.status(), format!("Failed to read multipart: {e}"));
        }
    };

    let filename = upload.filename.unwrap_or_default();
    let content_type = match ContentType::from_extension(&filename) {
        Some(ct @ (ContentType::Pdf | ContentType::Docx)) => ct,
        _ => {
            tracing::warn!(filename = %filename, "Unsupported mixed-doc file type");
            return error_response(StatusCode::BAD_REQUEST, "Unsupported file type");
        }
    };

    let document = Document::new(filename, content_type, upload.data.len() as u64);

    match state
        .analysis_service
        .analyze_document(&upload.data, &document)
        .await
    {
        Ok(analysis) => (StatusCode::OK, Json(analysis)).into_response(),
        Err(AnalysisError::UnsupportedType(_)) => {
            error_response(StatusCode::BAD_REQUEST, "Unsupported file type")
        }
        Err(AnalysisError::Extraction(e)) => {
            tracing::error!(error = %e, document_id = %document.id, "Error processing mixed document");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Could not analyze file. {}: {e}", e.kind()),
            )
        }
    }
}

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::ports::{FileLoaderError, LlmClient};
use crate::application::services::AnalysisError;
use crate::presentation::state::AppState;

use super::error::error_response;
use super::upload::find_file_field;

#[tracing::instrument(skip(state, multipart))]
pub async fn summarize_image_handler<L>(
    State(state): State<AppState<L>>,
    mut multipart: Multipart,
) -> Response
where
    L: LlmClient + 'static,
{
    let upload = match find_file_field(&mut multipart, "image").await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            tracing::warn!("Image request with no image part");
            return error_response(StatusCode::BAD_REQUEST, "No image file provided");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return error_response(e.status(), format!("Failed to read multipart: {e}"));
        }
    };

    let filename = upload.filename.unwrap_or_else(|| "image".to_string());

    match state
        .analysis_service
        .analyze_image(&upload.data, &filename)
        .await
    {
        Ok(analysis) => (StatusCode::OK, Json(analysis)).into_response(),
        Err(AnalysisError::Extraction(FileLoaderError::InvalidImage(reason))) => {
            tracing::warn!(%reason, "Undecodable image");
            error_response(
                StatusCode::BAD_REQUEST,
                format!("Could not read image: {reason}"),
            )
        }
        Err(AnalysisError::Extraction(FileLoaderError::NoContentFound(_))) => {
            tracing::warn!(filename = %filename, "Nothing readable in image");
            error_response(
                StatusCode::BAD_REQUEST,
                "Could not read text or detect table.",
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Error processing image");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Could not analyze image. {e}"),
            )
        }
    }
}

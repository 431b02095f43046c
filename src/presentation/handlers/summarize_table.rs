use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::ports::LlmClient;
use crate::presentation::state::AppState;

use super::error::error_response;
use super::text_request::TextRequest;

/// Unparseable CSV is still a 200 carrying an `error` field.
#[tracing::instrument(skip(state, body))]
pub async fn summarize_table_handler<L>(
    State(state): State<AppState<L>>,
    body: Result<Json<TextRequest>, JsonRejection>,
) -> Response
where
    L: LlmClient + 'static,
{
    let csv_text = match body {
        Ok(Json(TextRequest { text: Some(text) })) => text,
        Ok(_) => return error_response(StatusCode::BAD_REQUEST, "No CSV text provided"),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(error = %rejection, "Request body too large");
            return error_response(StatusCode::PAYLOAD_TOO_LARGE, rejection.body_text());
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected summarize-table body");
            return error_response(StatusCode::BAD_REQUEST, "No CSV text provided");
        }
    };

    match state.analysis_service.summarize_csv(&csv_text).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error in /summarize-table");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error analyzing CSV.",
            )
        }
    }
}

use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};

use crate::models::submission::ContactPayload;
use crate::responses::JsonResponse;
use crate::services::fanout;
use crate::state::AppState;

/// Contact form endpoint. Validation failures stop the pipeline before any
/// network call; after that the fan-out coordinator decides the outcome.
pub async fn handle_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> Response {
    let submission = match payload.validate() {
        Ok(submission) => submission,
        Err(err) => return JsonResponse::bad_request(&err.to_string()).into_response(),
    };

    match fanout::dispatch(
        state.mailer.as_ref(),
        state.sheets.as_deref(),
        &state.config,
        &submission,
    )
    .await
    {
        Ok(report) => JsonResponse::submitted(report).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "contact form dispatch failed");
            JsonResponse::server_error("Failed to send email", &err.to_string()).into_response()
        }
    }
}

use crate::api::AppState;
use crate::api::schemas::netlify::NetlifyPayload;
use crate::api::schemas::submissions::{EnqueueResponse, validate};
use crate::domain::submission::Submission;
use crate::error::{AppError, Result};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Queues a submission that is already in the relay's own format.
pub async fn enqueue_submission(
    State(state): State<AppState>,
    Json(submission): Json<Submission>,
) -> Result<impl IntoResponse> {
    enqueue(&state, submission).await
}

/// Queues a submission delivered by a Netlify form webhook.
pub async fn netlify_webhook(
    State(state): State<AppState>,
    Json(payload): Json<NetlifyPayload>,
) -> Result<impl IntoResponse> {
    enqueue(&state, Submission::from(payload)).await
}

async fn enqueue(state: &AppState, submission: Submission) -> Result<(StatusCode, Json<EnqueueResponse>)> {
    validate(&submission).map_err(AppError::BadRequest)?;

    let message_id = state.queue.enqueue(&submission).await.map_err(|e| AppError::Queue(e.to_string()))?;

    tracing::info!(
        message_id = %message_id,
        submission_id = %submission.id,
        site_url = %submission.site_url,
        form_name = %submission.form_name,
        "Submission queued"
    );

    Ok((StatusCode::ACCEPTED, Json(EnqueueResponse { message_id })))
}

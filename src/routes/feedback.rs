//! Product feedback route handlers

use crate::error::ApiResult;
use crate::extractors::extract_validated_json;
use crate::models::{CreateFeedbackRequest, Feedback, NewFeedback};
use crate::state::SharedState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::{debug, info};

/// Record feedback, dated today (UTC)
pub async fn create_feedback(
    State(state): State<SharedState>,
    body: Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Feedback>)> {
    let payload = extract_validated_json(body)?;

    let today = Utc::now().date_naive();
    let feedback = state
        .store
        .create_feedback(NewFeedback::from_request(payload, today))
        .await?;

    info!(
        "Feedback {} recorded for product {} (rating {})",
        feedback.id, feedback.product_id, feedback.rating
    );

    Ok((StatusCode::CREATED, Json(feedback)))
}

/// List feedback, newest first
pub async fn list_feedback(State(state): State<SharedState>) -> ApiResult<Json<Vec<Feedback>>> {
    let feedback = state.store.list_feedback().await?;
    debug!("Listed {} feedback entries", feedback.len());
    Ok(Json(feedback))
}

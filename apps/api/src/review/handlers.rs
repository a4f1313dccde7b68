//! Axum route handlers for the Review API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::review::models::{ReviewRequest, ReviewResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    /// Log correlation id. Not an idempotency key: resubmitting triggers a new review.
    pub review_id: Uuid,
    pub reviewed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: ReviewResult,
    /// Set when any field could not be extracted; the caller should route the
    /// review to a human instead of trusting the partial verdict.
    pub needs_manual_review: bool,
}

/// POST /api/v1/reviews
///
/// Scores a proposal's abstract and objectives with the language model.
pub async fn handle_create_review(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    let review_id = Uuid::new_v4();

    let result = state
        .reviewer
        .review(&request)
        .instrument(info_span!("review", %review_id))
        .await?;

    info!(
        "Review {review_id} complete (missing fields: {})",
        result.missing_fields().len()
    );

    Ok(Json(ReviewResponse {
        review_id,
        reviewed_at: Utc::now(),
        needs_manual_review: !result.is_complete(),
        result,
    }))
}

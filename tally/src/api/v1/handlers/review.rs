use axum::extract::{Query, State};

use crate::api::v1::dto::ReviewQuery;
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::{AppState, RequesterId};
use crate::services::MeetingReview;

/// Ten years of weekly periods; offsets past this are junk input.
const MAX_REVIEW_OFFSET: u32 = 520;

/// The joined review board for one period: per marketer, targets next to
/// aggregated actuals, achievement rates, the saved meeting log and the
/// retargeting follow-up alert.
#[utoipa::path(
    get,
    path = "/api/v1/meeting/review",
    tag = "review",
    params(ReviewQuery),
    responses(
        (status = 200, description = "Review board for the period", body = MeetingReview),
        (status = 400, description = "Offset out of range", body = ApiError),
        (status = 401, description = "Missing or invalid API key", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn meeting_review(
    State(state): State<AppState>,
    RequesterId(requester): RequesterId,
    Query(query): Query<ReviewQuery>,
) -> ApiResponse<MeetingReview> {
    if query.offset > MAX_REVIEW_OFFSET {
        return ApiResponse::error(
            ErrorCode::InvalidRequest,
            format!("offset must be at most {MAX_REVIEW_OFFSET}"),
        );
    }

    let today = state.config.reporting.business_today();

    match state
        .review
        .build(
            query.period_type,
            query.offset as i32,
            requester.as_deref(),
            today,
        )
        .await
    {
        Ok(review) => ApiResponse::success(review),
        Err(err) => err.into(),
    }
}

use axum::extract::{Query, State};
use axum::Json;

use crate::api::v1::dto::{BulkApplyRequest, PeriodQuery, UpsertTargetRequest};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode, ResponseMeta};
use crate::api::{AppState, RequesterId};
use crate::models::{Period, TargetRecord};

/// List every marketer's target row for one period. Rows are only
/// returned for users who have saved targets; absent rows mean absent
/// targets, not zeros.
#[utoipa::path(
    get,
    path = "/api/v1/meeting/targets",
    tag = "targets",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Targets for the period", body = Vec<TargetRecord>),
        (status = 401, description = "Missing or invalid API key", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_targets(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> ApiResponse<Vec<TargetRecord>> {
    let today = state.config.reporting.business_today();
    let current = Period::current(today, query.period_type);
    let year = query.year.unwrap_or(current.year);
    let index = query.week_or_month.unwrap_or(current.index);

    match state.targets.list_for_period(query.period_type, year, index).await {
        Ok(records) => {
            let total = records.len() as u64;
            ApiResponse::success_with_meta(records, ResponseMeta { total: Some(total) })
        }
        Err(err) => err.into(),
    }
}

/// Upsert a single target row. The caller identified by `X-User-Id` must
/// own the row, and the period must be the current or previous one.
#[utoipa::path(
    post,
    path = "/api/v1/meeting/targets",
    tag = "targets",
    request_body = UpsertTargetRequest,
    responses(
        (status = 200, description = "Target saved", body = TargetRecord),
        (status = 401, description = "Missing identity or API key", body = ApiError),
        (status = 403, description = "Not the owner, or period outside the edit window", body = ApiError),
        (status = 404, description = "Unknown user", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upsert_target(
    State(state): State<AppState>,
    RequesterId(requester): RequesterId,
    Json(body): Json<UpsertTargetRequest>,
) -> ApiResponse<TargetRecord> {
    let Some(requester) = requester else {
        return ApiResponse::error(ErrorCode::Unauthorized, "X-User-Id header is required");
    };

    let today = state.config.reporting.business_today();
    let period = Period::new(body.year, body.fields.unit(), body.week_or_month);

    match state
        .targets
        .upsert(
            &requester,
            &body.user_id,
            period,
            &body.fields,
            body.actual_retargeting_customers,
            today,
        )
        .await
    {
        Ok(record) => ApiResponse::success(record),
        Err(err) => err.into(),
    }
}

/// Apply one set of target values to a run of consecutive periods,
/// starting at the current one. Actual-side counters are reset on every
/// period written.
#[utoipa::path(
    post,
    path = "/api/v1/meeting/targets:bulk",
    tag = "targets",
    request_body = BulkApplyRequest,
    responses(
        (status = 200, description = "Targets written", body = Vec<TargetRecord>),
        (status = 400, description = "Count out of range", body = ApiError),
        (status = 401, description = "Missing identity or API key", body = ApiError),
        (status = 403, description = "Not the owner", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn bulk_apply_targets(
    State(state): State<AppState>,
    RequesterId(requester): RequesterId,
    Json(body): Json<BulkApplyRequest>,
) -> ApiResponse<Vec<TargetRecord>> {
    let Some(requester) = requester else {
        return ApiResponse::error(ErrorCode::Unauthorized, "X-User-Id header is required");
    };

    let today = state.config.reporting.business_today();

    match state
        .targets
        .bulk_apply(&requester, &body.user_id, &body.fields, body.count, today)
        .await
    {
        Ok(records) => {
            let total = records.len() as u64;
            ApiResponse::success_with_meta(records, ResponseMeta { total: Some(total) })
        }
        Err(err) => err.into(),
    }
}

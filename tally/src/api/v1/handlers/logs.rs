use axum::extract::{Query, State};
use axum::Json;

use crate::api::v1::dto::{ListLogsQuery, SaveLogRequest};
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::AppState;
use crate::db::repository::MeetingLogsRepository;
use crate::models::{MeetingLog, Period};

/// List every saved meeting log for one period.
#[utoipa::path(
    get,
    path = "/api/v1/meeting/logs",
    tag = "logs",
    params(ListLogsQuery),
    responses(
        (status = 200, description = "Logs for the period", body = Vec<MeetingLog>),
        (status = 401, description = "Missing or invalid API key", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<ListLogsQuery>,
) -> ApiResponse<Vec<MeetingLog>> {
    let today = state.config.reporting.business_today();
    let current = Period::current(today, query.meeting_type);
    let year = query.year.unwrap_or(current.year);
    let index = query.week_or_month.unwrap_or(current.index);

    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(err) => return err.into(),
    };

    match MeetingLogsRepository::list_for_period(&conn, query.meeting_type, year, index).await {
        Ok(logs) => {
            let total = logs.len() as u64;
            ApiResponse::success_with_meta(logs, ResponseMeta { total: Some(total) })
        }
        Err(err) => err.into(),
    }
}

/// Save (or resave) a meeting log. Logs carry the conversation, not the
/// numbers, so they are not gated by the target edit window: a review
/// meeting often writes up last month well after it froze.
#[utoipa::path(
    post,
    path = "/api/v1/meeting/logs",
    tag = "logs",
    request_body = SaveLogRequest,
    responses(
        (status = 200, description = "Log saved", body = MeetingLog),
        (status = 401, description = "Missing or invalid API key", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn save_log(
    State(state): State<AppState>,
    Json(body): Json<SaveLogRequest>,
) -> ApiResponse<MeetingLog> {
    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(err) => return err.into(),
    };

    let period = Period::new(body.year, body.meeting_type, body.week_or_month);
    let reflection = body.reflection.unwrap_or_default();
    let action_plan = body.action_plan.unwrap_or_default();
    let snapshot = body.snapshot.unwrap_or(serde_json::Value::Null);

    match MeetingLogsRepository::upsert(
        &conn,
        &body.user_id,
        period,
        &reflection,
        &action_plan,
        &snapshot,
    )
    .await
    {
        Ok(log) => ApiResponse::success(log),
        Err(err) => err.into(),
    }
}

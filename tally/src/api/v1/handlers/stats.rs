use std::collections::HashMap;

use axum::extract::{Query, State};
use chrono::Datelike;

use crate::api::v1::dto::{PeriodQuery, PerformanceQuery, TrackingStats, WeeklySumQuery};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::db::repository::ContactHistoryRepository;
use crate::models::{DateSpan, Period, PeriodUnit};
use crate::services::{MonthlyRollup, PerformanceStats};

/// Unique customers contacted per marketer within one period. A customer
/// contacted three times in the week still counts once.
#[utoipa::path(
    get,
    path = "/api/v1/meeting/sales-tracking-stats",
    tag = "stats",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Unique contact counts per user", body = TrackingStats),
        (status = 401, description = "Missing or invalid API key", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn sales_tracking_stats(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> ApiResponse<TrackingStats> {
    let today = state.config.reporting.business_today();
    let current = Period::current(today, query.period_type);
    let period = Period::new(
        query.year.unwrap_or(current.year),
        query.period_type,
        query.week_or_month.unwrap_or(current.index),
    );
    let span = period.span();

    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(err) => return err.into(),
    };

    match ContactHistoryRepository::unique_customers_by_user(&conn, span).await {
        Ok(rows) => {
            let counts: HashMap<String, i64> = rows.into_iter().collect();
            ApiResponse::success(TrackingStats {
                period_type: period.unit.as_str().to_string(),
                year: period.year,
                week_or_month: period.index,
                start_date: span.start,
                end_date: span.end,
                counts,
            })
        }
        Err(err) => err.into(),
    }
}

/// Weekly channel-activity totals rolled up across one calendar month. A
/// week belongs to the month its Monday falls in, so every week lands in
/// exactly one month.
#[utoipa::path(
    get,
    path = "/api/v1/meeting/weekly-sum-for-month",
    tag = "stats",
    params(WeeklySumQuery),
    responses(
        (status = 200, description = "Per-week target and actual sums", body = MonthlyRollup),
        (status = 400, description = "Month out of range", body = ApiError),
        (status = 401, description = "Missing or invalid API key", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn weekly_sum_for_month(
    State(state): State<AppState>,
    Query(query): Query<WeeklySumQuery>,
) -> ApiResponse<MonthlyRollup> {
    let today = state.config.reporting.business_today();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or(today.month() as i32);
    // Non-positive months fall through to the service's range check.
    let month = u32::try_from(month).unwrap_or(0);

    match state.rollup.monthly(year, month).await {
        Ok(rollup) => ApiResponse::success(rollup),
        Err(err) => err.into(),
    }
}

/// Dashboard performance report over an arbitrary date range, defaulting
/// to the current business month.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/performance-stats",
    tag = "stats",
    params(PerformanceQuery),
    responses(
        (status = 200, description = "Per-manager performance over the range", body = PerformanceStats),
        (status = 400, description = "Inverted date range", body = ApiError),
        (status = 401, description = "Missing or invalid API key", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn performance_stats(
    State(state): State<AppState>,
    Query(query): Query<PerformanceQuery>,
) -> ApiResponse<PerformanceStats> {
    let today = state.config.reporting.business_today();
    let month_span = Period::current(today, PeriodUnit::Monthly).span();
    let span = DateSpan {
        start: query.start_date.unwrap_or(month_span.start),
        end: query.end_date.unwrap_or(month_span.end),
    };

    match state
        .performance
        .stats(span, query.manager.as_deref(), today)
        .await
    {
        Ok(stats) => ApiResponse::success(stats),
        Err(err) => err.into(),
    }
}

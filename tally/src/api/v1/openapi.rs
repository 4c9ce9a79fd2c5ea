use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use crate::models;
use crate::services;

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tally API",
        version = "1.0.0",
        description = "Sales target and actual reconciliation for weekly and monthly review meetings.",
    ),
    paths(
        handlers::health::health,
        handlers::targets::list_targets,
        handlers::targets::upsert_target,
        handlers::targets::bulk_apply_targets,
        handlers::logs::list_logs,
        handlers::logs::save_log,
        handlers::review::meeting_review,
        handlers::stats::sales_tracking_stats,
        handlers::stats::weekly_sum_for_month,
        handlers::stats::performance_stats,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Domain
        models::PeriodUnit,
        models::WeeklyTargets,
        models::MonthlyTargets,
        models::TargetFields,
        models::TargetRecord,
        models::MeetingLog,
        models::ActualSnapshot,
        models::RetargetingAlert,
        models::MetricReview,
        models::Tier,
        models::User,
        // Review
        services::MeetingReview,
        services::ReviewEntry,
        services::ReviewMetrics,
        services::WeeklyReview,
        services::MonthlyReview,
        // Rollup
        services::MonthlyRollup,
        services::UserRollup,
        services::WeekSlice,
        // Performance
        services::PerformanceStats,
        services::PerformanceSummary,
        services::ManagerPerformance,
        // Requests
        dto::targets::UpsertTargetRequest,
        dto::targets::BulkApplyRequest,
        dto::logs::SaveLogRequest,
        dto::stats::TrackingStats,
        // Health (handler-local types)
        handlers::health::HealthData,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "targets", description = "Per-user period targets: listing, upsert, bulk apply"),
        (name = "logs", description = "Meeting logs: reflections and action plans per period"),
        (name = "review", description = "Joined target/actual review board for meetings"),
        (name = "stats", description = "Tracking, rollup and dashboard reports"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let meeting = Router::new()
        .route(
            "/targets",
            get(handlers::targets::list_targets).post(handlers::targets::upsert_target),
        )
        .route("/targets:bulk", post(handlers::targets::bulk_apply_targets))
        .route(
            "/logs",
            get(handlers::logs::list_logs).post(handlers::logs::save_log),
        )
        .route("/review", get(handlers::review::meeting_review))
        .route(
            "/sales-tracking-stats",
            get(handlers::stats::sales_tracking_stats),
        )
        .route(
            "/weekly-sum-for-month",
            get(handlers::stats::weekly_sum_for_month),
        );

    let dashboard = Router::new().route(
        "/performance-stats",
        get(handlers::stats::performance_stats),
    );

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router());

    let protected_routes = Router::new()
        .nest("/meeting", meeting)
        .nest("/dashboard", dashboard)
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}

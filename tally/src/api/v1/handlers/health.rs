use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::v1::response::ApiResponse;
use crate::api::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Liveness check; also pings the database so a broken connection shows
/// up here before it shows up in a meeting.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthData)
    )
)]
pub async fn health(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let database = match state.db.ping().await {
        Ok(()) => "ok".to_string(),
        Err(err) => {
            tracing::error!(error = %err, "database ping failed");
            "unreachable".to_string()
        }
    };

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::PeriodUnit;

fn default_unit() -> PeriodUnit {
    PeriodUnit::Weekly
}

/// Query of `GET /api/v1/meeting/logs`. Logs are keyed by meeting type,
/// which shares the period calendar.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListLogsQuery {
    #[serde(default = "default_unit")]
    pub meeting_type: PeriodUnit,
    pub year: Option<i32>,
    pub week_or_month: Option<i32>,
}

/// Body of `POST /api/v1/meeting/logs`. Saving is idempotent per
/// `(userId, meetingType, year, weekOrMonth)`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveLogRequest {
    pub user_id: String,
    pub meeting_type: PeriodUnit,
    pub year: i32,
    pub week_or_month: i32,
    #[serde(default)]
    pub reflection: Option<String>,
    #[serde(default)]
    pub action_plan: Option<String>,
    /// Free-form snapshot of the metrics discussed in the meeting,
    /// stored verbatim and echoed back on reads.
    #[serde(default)]
    pub snapshot: Option<serde_json::Value>,
}

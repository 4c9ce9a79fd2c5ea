//! Meeting review logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::period::PeriodUnit;

/// One saved meeting review: free-text reflection and action plan plus a
/// frozen JSON snapshot of the actuals at save time. Upserting the same
/// (user, type, year, index) overwrites; snapshots are not versioned.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingLog {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub meeting_type: PeriodUnit,
    pub year: i32,
    pub week_or_month: i32,
    pub reflection: String,
    pub action_plan: String,
    pub snapshot: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

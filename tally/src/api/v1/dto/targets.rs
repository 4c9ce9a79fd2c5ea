use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{PeriodUnit, TargetFields};

fn default_unit() -> PeriodUnit {
    PeriodUnit::Weekly
}

/// Period selector shared by the list endpoints. Omitted `year` /
/// `weekOrMonth` resolve to the current period for today's business date.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    #[serde(default = "default_unit")]
    pub period_type: PeriodUnit,
    pub year: Option<i32>,
    pub week_or_month: Option<i32>,
}

/// Body of `POST /api/v1/meeting/targets`.
///
/// The flattened [`TargetFields`] carries `periodType` and the matching
/// `targets` object, so a weekly and a monthly upsert differ only in the
/// payload variant.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertTargetRequest {
    pub user_id: String,
    pub year: i32,
    pub week_or_month: i32,
    #[serde(flatten)]
    pub fields: TargetFields,
    /// Overwrites the manual retargeting-customer actual when present;
    /// omitted, the stored value is preserved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_retargeting_customers: Option<i64>,
}

/// Body of `POST /api/v1/meeting/targets:bulk`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkApplyRequest {
    pub user_id: String,
    /// Number of consecutive periods to write, starting at the current one.
    pub count: u32,
    #[serde(flatten)]
    pub fields: TargetFields,
}

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query of `GET /api/v1/meeting/weekly-sum-for-month`. Omitted fields
/// default to the current business month.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct WeeklySumQuery {
    pub year: Option<i32>,
    pub month: Option<i32>,
}

/// Query of `GET /api/v1/dashboard/performance-stats`. The date range
/// defaults to the current business month when omitted.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PerformanceQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Restrict the report to one manager; look-alike spellings of the
    /// name are matched as well.
    pub manager: Option<String>,
}

/// Response of `GET /api/v1/meeting/sales-tracking-stats`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingStats {
    pub period_type: String,
    pub year: i32,
    pub week_or_month: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Unique customers contacted within the period, keyed by user id.
    pub counts: HashMap<String, i64>,
}

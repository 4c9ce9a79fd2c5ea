use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::models::PeriodUnit;

fn default_unit() -> PeriodUnit {
    PeriodUnit::Weekly
}

/// Query of `GET /api/v1/meeting/review`.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReviewQuery {
    #[serde(default = "default_unit")]
    pub period_type: PeriodUnit,
    /// How many periods to step back from the current one. 0 reviews the
    /// current period, 1 the previous.
    #[serde(default)]
    pub offset: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn review_query_defaults() {
        let query: ReviewQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.period_type, PeriodUnit::Weekly);
        assert_eq!(query.offset, 0);
    }
}

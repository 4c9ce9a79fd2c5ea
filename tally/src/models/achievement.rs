//! Achievement-rate computation and tiering.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Percentage of target reached, rounded to the nearest whole percent.
///
/// A zero target always yields 0 — never a division error or an infinite
/// rate — regardless of the actual value.
pub fn rate(actual: i64, target: i64) -> i64 {
    if target == 0 {
        return 0;
    }
    (actual as f64 / target as f64 * 100.0).round() as i64
}

/// Presentation tier for an achievement rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    OnTrack,
    AtRisk,
    Behind,
}

impl Tier {
    pub fn for_rate(rate: i64) -> Self {
        if rate >= 100 {
            Tier::OnTrack
        } else if rate >= 80 {
            Tier::AtRisk
        } else {
            Tier::Behind
        }
    }
}

/// One target/actual pair with its derived rate and tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricReview {
    pub target: i64,
    pub actual: i64,
    pub rate: i64,
    pub status: Tier,
}

impl MetricReview {
    pub fn of(target: i64, actual: i64) -> Self {
        let rate = rate(actual, target);
        Self {
            target,
            actual,
            rate,
            status: Tier::for_rate(rate),
        }
    }
}

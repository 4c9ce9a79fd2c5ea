//! Target records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::period::PeriodUnit;

/// Weekly activity targets: one count per outreach channel plus the
/// retargeting/existing follow-up quotas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTargets {
    #[serde(default)]
    pub form: i64,
    #[serde(default)]
    pub dm: i64,
    #[serde(default)]
    pub chat: i64,
    #[serde(default)]
    pub phone: i64,
    #[serde(default)]
    pub email: i64,
    #[serde(default)]
    pub retargeting: i64,
    #[serde(default)]
    pub existing: i64,
    #[serde(default)]
    pub retargeting_customers: i64,
}

impl WeeklyTargets {
    /// Sum of the five outreach-channel targets.
    pub fn channel_total(&self) -> i64 {
        self.form + self.dm + self.chat + self.phone + self.email
    }
}

/// Monthly revenue and contract targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTargets {
    #[serde(default)]
    pub revenue: i64,
    #[serde(default)]
    pub new_revenue: i64,
    #[serde(default)]
    pub contracts: i64,
    #[serde(default)]
    pub new_contracts: i64,
}

/// The per-period target payload. Weekly and monthly targets are distinct
/// shapes; the variant is matched exhaustively wherever targets are
/// persisted or reviewed.
///
/// On the wire this serializes adjacently tagged, so a flattened parent
/// carries `"periodType": "weekly", "targets": { ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "periodType", content = "targets", rename_all = "lowercase")]
pub enum TargetFields {
    Weekly(WeeklyTargets),
    Monthly(MonthlyTargets),
}

impl TargetFields {
    pub fn unit(&self) -> PeriodUnit {
        match self {
            TargetFields::Weekly(_) => PeriodUnit::Weekly,
            TargetFields::Monthly(_) => PeriodUnit::Monthly,
        }
    }

    /// An all-zero payload of the given unit, used when a period has no
    /// stored target.
    pub fn zeroed(unit: PeriodUnit) -> Self {
        match unit {
            PeriodUnit::Weekly => TargetFields::Weekly(WeeklyTargets::default()),
            PeriodUnit::Monthly => TargetFields::Monthly(MonthlyTargets::default()),
        }
    }
}

/// A stored target row joined with its owner's display name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TargetRecord {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub year: i32,
    pub week_or_month: i32,
    #[serde(flatten)]
    pub fields: TargetFields,
    /// Manually maintained actual for the retargeting-customer quota.
    /// Reset to zero by bulk application.
    pub actual_retargeting_customers: i64,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn weekly_payload_deserializes_from_tagged_wire_shape() {
        let json = r#"{
            "periodType": "weekly",
            "targets": { "form": 5, "dm": 3, "phone": 2 }
        }"#;
        let fields: TargetFields = serde_json::from_str(json).unwrap();
        match fields {
            TargetFields::Weekly(w) => {
                assert_eq!(w.form, 5);
                assert_eq!(w.dm, 3);
                assert_eq!(w.phone, 2);
                assert_eq!(w.chat, 0); // omitted fields default to zero
                assert_eq!(w.channel_total(), 10);
            }
            TargetFields::Monthly(_) => panic!("expected weekly variant"),
        }
    }

    #[test]
    fn monthly_payload_round_trips() {
        let fields = TargetFields::Monthly(MonthlyTargets {
            revenue: 1_000_000,
            new_revenue: 400_000,
            contracts: 10,
            new_contracts: 4,
        });
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["periodType"], "monthly");
        assert_eq!(json["targets"]["newRevenue"], 400_000);
        let back: TargetFields = serde_json::from_value(json).unwrap();
        assert_eq!(back, fields);
    }

    #[test]
    fn zeroed_matches_unit() {
        assert_eq!(TargetFields::zeroed(PeriodUnit::Weekly).unit(), PeriodUnit::Weekly);
        assert_eq!(TargetFields::zeroed(PeriodUnit::Monthly).unit(), PeriodUnit::Monthly);
    }
}

//! Derived actuals.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Everything a user actually did in a date span, aggregated from the
/// transaction tables. Never persisted as-is; meeting logs store a frozen
/// JSON copy at save time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualSnapshot {
    // Outreach channel contact counts (new-sales activities).
    pub form: i64,
    pub dm: i64,
    pub chat: i64,
    pub phone: i64,
    pub email: i64,
    // Follow-up contact counts by category.
    pub retargeting_contacts: i64,
    pub existing_contacts: i64,
    /// Distinct customers touched in the span, from the contact-history
    /// ledger. Repeat contacts with one customer count once.
    pub unique_customers: i64,
    // Revenue sums by contract type. Terminations carry an amount for
    // reporting but never add to revenue totals.
    pub new_sales: i64,
    pub renewal_sales: i64,
    pub termination_sales: i64,
    // Contract counts by type.
    pub new_contracts: i64,
    pub renewal_contracts: i64,
    pub termination_contracts: i64,
}

impl ActualSnapshot {
    /// Sum of the five outreach-channel counts.
    pub fn channel_total(&self) -> i64 {
        self.form + self.dm + self.chat + self.phone + self.email
    }

    /// Revenue that counts toward the revenue target.
    pub fn total_sales(&self) -> i64 {
        self.new_sales + self.renewal_sales
    }

    /// Contracts of every type, including terminations.
    pub fn total_contracts(&self) -> i64 {
        self.new_contracts + self.renewal_contracts + self.termination_contracts
    }
}

/// Due-date buckets for a user's tracked retargeting customers, relative
/// to today and the current week. Computed on read, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetargetingAlert {
    pub overdue: i64,
    pub due_this_week: i64,
    pub upcoming: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_exclude_terminations_from_revenue() {
        let snapshot = ActualSnapshot {
            new_sales: 100,
            renewal_sales: 50,
            termination_sales: 30,
            new_contracts: 2,
            renewal_contracts: 1,
            termination_contracts: 1,
            ..Default::default()
        };
        assert_eq!(snapshot.total_sales(), 150);
        assert_eq!(snapshot.total_contracts(), 4);
    }

    #[test]
    fn channel_total_sums_five_channels() {
        let snapshot = ActualSnapshot {
            form: 1,
            dm: 2,
            chat: 3,
            phone: 4,
            email: 5,
            retargeting_contacts: 100,
            ..Default::default()
        };
        assert_eq!(snapshot.channel_total(), 15);
    }
}

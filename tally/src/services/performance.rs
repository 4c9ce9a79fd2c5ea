//! Per-manager performance statistics for the dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::repository::{
    ActivitiesRepository, RetargetingRepository, SalesRepository, UsersRepository,
};
use crate::db::Database;
use crate::error::{Result, TallyError};
use crate::models::naming::names_match;
use crate::models::{DateSpan, Period, PeriodUnit, RetargetingAlert};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: PerformanceSummary,
    pub managers: Vec<ManagerPerformance>,
    pub retargeting_alert: RetargetingAlert,
}

/// Aggregate over all managers in scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total_sales: i64,
    pub contract_count: i64,
    pub total_activities: i64,
    /// Contracts per activity contact, percent with two decimals.
    pub contract_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerPerformance {
    pub manager_name: String,
    pub form_count: i64,
    pub dm_count: i64,
    pub chat_count: i64,
    pub phone_count: i64,
    pub email_count: i64,
    pub new_contacts: i64,
    pub retargeting_contacts: i64,
    pub existing_contacts: i64,
    pub new_contract_count: i64,
    pub renewal_count: i64,
    pub termination_count: i64,
    pub new_sales: i64,
    pub renewal_sales: i64,
    pub termination_sales: i64,
    pub total_sales: i64,
    pub contract_rate: f64,
}

#[derive(Clone)]
pub struct PerformanceService {
    db: Database,
}

impl PerformanceService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Stats for the span, optionally narrowed to one manager's display
    /// name (matched with look-alike folding). The retargeting alert is
    /// bucketed against `today` and the end of the current week.
    pub async fn stats(
        &self,
        span: DateSpan,
        manager: Option<&str>,
        today: NaiveDate,
    ) -> Result<PerformanceStats> {
        if span.end < span.start {
            return Err(TallyError::Validation(
                "endDate must not precede startDate".to_string(),
            ));
        }

        let conn = self.db.connect()?;
        let users = UsersRepository::list_marketers(&conn).await?;
        let activity = ActivitiesRepository::counts_by_manager(&conn, span).await?;
        let sales = SalesRepository::totals_by_user(&conn, span).await?;

        let week_end = Period::current(today, PeriodUnit::Weekly).span().end;

        let mut managers = Vec::new();
        for user in &users {
            if let Some(filter) = manager {
                if !names_match(filter, &user.name) {
                    continue;
                }
            }

            let mut row = ManagerPerformance {
                manager_name: user.name.clone(),
                ..Default::default()
            };

            // Stored activity rows may use look-alike spellings; fold
            // every matching group into this manager.
            for group in activity.iter().filter(|a| names_match(&a.manager_name, &user.name)) {
                row.form_count += group.form;
                row.dm_count += group.dm;
                row.chat_count += group.chat;
                row.phone_count += group.phone;
                row.email_count += group.email;
                row.retargeting_contacts += group.retargeting_contacts;
                row.existing_contacts += group.existing_contacts;
            }
            row.new_contacts =
                row.form_count + row.dm_count + row.chat_count + row.phone_count + row.email_count;

            if let Some((_, _, totals)) = sales.iter().find(|(user_id, _, _)| *user_id == user.id) {
                row.new_contract_count = totals.new_contracts;
                row.renewal_count = totals.renewal_contracts;
                row.termination_count = totals.termination_contracts;
                row.new_sales = totals.new_sales;
                row.renewal_sales = totals.renewal_sales;
                row.termination_sales = totals.termination_sales;
                row.total_sales = totals.new_sales + totals.renewal_sales;
            }

            let contacts = row.new_contacts + row.retargeting_contacts + row.existing_contacts;
            let contracts = row.new_contract_count + row.renewal_count;
            row.contract_rate = contract_rate(contracts, contacts);

            managers.push(row);
        }

        managers.sort_by(|a, b| b.total_sales.cmp(&a.total_sales));

        let summary = summarize(&managers);

        let retargeting_alert = match manager {
            Some(name) => {
                RetargetingRepository::alert_for_manager(&conn, name, today, week_end).await?
            }
            None => RetargetingRepository::alert_overall(&conn, today, week_end).await?,
        };

        Ok(PerformanceStats {
            start_date: span.start,
            end_date: span.end,
            summary,
            managers,
            retargeting_alert,
        })
    }
}

fn summarize(managers: &[ManagerPerformance]) -> PerformanceSummary {
    let total_sales = managers.iter().map(|m| m.total_sales).sum();
    let contract_count = managers.iter().map(|m| m.new_contract_count + m.renewal_count).sum();
    let total_activities = managers
        .iter()
        .map(|m| m.new_contacts + m.retargeting_contacts + m.existing_contacts)
        .sum();

    PerformanceSummary {
        total_sales,
        contract_count,
        total_activities,
        contract_rate: contract_rate(contract_count, total_activities),
    }
}

/// Contracts as a percentage of activity contacts, rounded to two
/// decimals. Zero contacts yields zero.
fn contract_rate(contracts: i64, contacts: i64) -> f64 {
    if contacts == 0 {
        return 0.0;
    }
    (contracts as f64 / contacts as f64 * 10_000.0).round() / 100.0
}

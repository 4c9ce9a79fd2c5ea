//! Monthly roll-up of weekly targets and actuals.
//!
//! A fiscal month owns the weeks whose Monday falls inside it, so every
//! week is counted under exactly one month. For each marketer the roll-up
//! sums the weekly outreach-channel target totals (a missing weekly target
//! counts as zero) against the channel totals actually recorded in each
//! week's span.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::repository::{ActivitiesRepository, TargetsRepository, UsersRepository};
use crate::db::Database;
use crate::error::{Result, TallyError};
use crate::models::naming::names_match;
use crate::models::{period, Period, PeriodUnit, TargetFields};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRollup {
    pub year: i32,
    pub month: u32,
    /// Week numbers belonging to this month, in order.
    pub weeks: Vec<i32>,
    pub users: Vec<UserRollup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRollup {
    pub user_id: String,
    pub user_name: String,
    pub total_target: i64,
    pub total_actual: i64,
    pub weekly: Vec<WeekSlice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekSlice {
    pub week: i32,
    pub target: i64,
    pub actual: i64,
}

#[derive(Clone)]
pub struct RollupService {
    db: Database,
}

impl RollupService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn monthly(&self, year: i32, month: u32) -> Result<MonthlyRollup> {
        if !(1..=12).contains(&month) {
            return Err(TallyError::Validation(format!(
                "month must be 1..=12, got {month}"
            )));
        }

        let conn = self.db.connect()?;
        let users = UsersRepository::list_marketers(&conn).await?;
        let weeks = period::weeks_in_month(year, month);

        let mut per_user: HashMap<String, UserRollup> = users
            .iter()
            .map(|u| {
                (
                    u.id.clone(),
                    UserRollup {
                        user_id: u.id.clone(),
                        user_name: u.name.clone(),
                        total_target: 0,
                        total_actual: 0,
                        weekly: Vec::with_capacity(weeks.len()),
                    },
                )
            })
            .collect();

        for &week in &weeks {
            let span = Period::new(year, PeriodUnit::Weekly, week).span();

            let target_rows =
                TargetsRepository::list_for_period(&conn, PeriodUnit::Weekly, year, week).await?;
            let targets_by_user: HashMap<&str, i64> = target_rows
                .iter()
                .map(|record| {
                    let total = match record.fields {
                        TargetFields::Weekly(w) => w.channel_total(),
                        TargetFields::Monthly(_) => 0,
                    };
                    (record.user_id.as_str(), total)
                })
                .collect();

            let activity = ActivitiesRepository::counts_by_manager(&conn, span).await?;

            for user in &users {
                let target = targets_by_user.get(user.id.as_str()).copied().unwrap_or(0);
                let actual = activity
                    .iter()
                    .filter(|a| names_match(&a.manager_name, &user.name))
                    .map(|a| a.channel_total())
                    .sum();

                if let Some(rollup) = per_user.get_mut(&user.id) {
                    rollup.total_target += target;
                    rollup.total_actual += actual;
                    rollup.weekly.push(WeekSlice { week, target, actual });
                }
            }
        }

        let mut result: Vec<UserRollup> = users
            .iter()
            .filter_map(|u| per_user.remove(&u.id))
            .collect();
        result.sort_by(|a, b| a.user_name.cmp(&b.user_name));

        Ok(MonthlyRollup {
            year,
            month,
            weeks,
            users: result,
        })
    }
}

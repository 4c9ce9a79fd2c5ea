//! Server-side composition of the meeting review view.
//!
//! Resolves the requested period from an offset, fans the actuals
//! aggregation out across all marketers, then joins targets, meeting
//! logs, retargeting alerts, and per-metric achievement rates into one
//! response the meeting screen can render directly.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::repository::{MeetingLogsRepository, RetargetingRepository, TargetsRepository};
use crate::db::repository::UsersRepository;
use crate::db::Database;
use crate::error::Result;
use crate::models::{
    ActualSnapshot, MeetingLog, MetricReview, MonthlyTargets, Period, PeriodUnit, RetargetingAlert,
    TargetFields, TargetRecord, WeeklyTargets,
};

use super::aggregator::ActualsAggregator;
use super::authorizer;

/// The full review payload for one period.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingReview {
    pub period_type: PeriodUnit,
    pub year: i32,
    pub week_or_month: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub entries: Vec<ReviewEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub user_id: String,
    pub user_name: String,
    /// Whether the requesting user may edit this row's target for the
    /// reviewed period.
    pub editable: bool,
    pub metrics: ReviewMetrics,
    pub actuals: ActualSnapshot,
    pub retargeting_alert: RetargetingAlert,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<MeetingLog>,
}

/// Per-metric target/actual/rate rows, shaped by the reviewed unit. The
/// enclosing review already names the period type, so the variant
/// serializes untagged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ReviewMetrics {
    Weekly(WeeklyReview),
    Monthly(MonthlyReview),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReview {
    pub form: MetricReview,
    pub dm: MetricReview,
    pub chat: MetricReview,
    pub phone: MetricReview,
    pub email: MetricReview,
    pub retargeting_contacts: MetricReview,
    pub existing_contacts: MetricReview,
    /// Manually maintained quota; its actual comes from the target row,
    /// not the aggregator.
    pub retargeting_customers: MetricReview,
    /// All five channels combined.
    pub activity_total: MetricReview,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReview {
    pub revenue: MetricReview,
    pub new_revenue: MetricReview,
    pub contracts: MetricReview,
    pub new_contracts: MetricReview,
}

#[derive(Clone)]
pub struct ReviewService {
    db: Database,
    aggregator: ActualsAggregator,
}

impl ReviewService {
    pub fn new(db: Database, aggregator: ActualsAggregator) -> Self {
        Self { db, aggregator }
    }

    /// Build the review for the period `offset` steps before the current
    /// one. `requesting_user` drives the per-row editability flag; `None`
    /// (no identity header) marks every row read-only.
    pub async fn build(
        &self,
        unit: PeriodUnit,
        offset: i32,
        requesting_user: Option<&str>,
        today: NaiveDate,
    ) -> Result<MeetingReview> {
        let period = Period::resolve(today, unit, offset);
        let span = period.span();
        let current_week_end = Period::current(today, PeriodUnit::Weekly).span().end;

        let conn = self.db.connect()?;
        let users = UsersRepository::list_marketers(&conn).await?;

        let targets: HashMap<String, TargetRecord> =
            TargetsRepository::list_for_period(&conn, unit, period.year, period.index)
                .await?
                .into_iter()
                .map(|record| (record.user_id.clone(), record))
                .collect();

        let logs: HashMap<String, MeetingLog> =
            MeetingLogsRepository::list_for_period(&conn, unit, period.year, period.index)
                .await?
                .into_iter()
                .map(|log| (log.user_id.clone(), log))
                .collect();

        let mut snapshots = self.aggregator.snapshots(&users, span).await;

        let mut entries = Vec::with_capacity(users.len());
        for user in &users {
            let actuals = snapshots.remove(&user.id).unwrap_or_default();
            let record = targets.get(&user.id);
            let metrics = build_metrics(unit, record, &actuals);
            let retargeting_alert =
                RetargetingRepository::alert_for_manager(&conn, &user.name, today, current_week_end)
                    .await?;
            let editable = requesting_user
                .map(|requester| authorizer::can_edit_target(requester, &user.id, period, today))
                .unwrap_or(false);

            entries.push(ReviewEntry {
                user_id: user.id.clone(),
                user_name: user.name.clone(),
                editable,
                metrics,
                actuals,
                retargeting_alert,
                log: logs.get(&user.id).cloned(),
            });
        }

        Ok(MeetingReview {
            period_type: unit,
            year: period.year,
            week_or_month: period.index,
            start_date: span.start,
            end_date: span.end,
            entries,
        })
    }
}

fn build_metrics(
    unit: PeriodUnit,
    record: Option<&TargetRecord>,
    actuals: &ActualSnapshot,
) -> ReviewMetrics {
    let fields = record
        .map(|r| r.fields)
        .unwrap_or_else(|| TargetFields::zeroed(unit));

    match fields {
        TargetFields::Weekly(targets) => {
            ReviewMetrics::Weekly(weekly_metrics(
                &targets,
                record.map(|r| r.actual_retargeting_customers).unwrap_or(0),
                actuals,
            ))
        }
        TargetFields::Monthly(targets) => {
            ReviewMetrics::Monthly(monthly_metrics(&targets, actuals))
        }
    }
}

fn weekly_metrics(
    targets: &WeeklyTargets,
    actual_retargeting_customers: i64,
    actuals: &ActualSnapshot,
) -> WeeklyReview {
    WeeklyReview {
        form: MetricReview::of(targets.form, actuals.form),
        dm: MetricReview::of(targets.dm, actuals.dm),
        chat: MetricReview::of(targets.chat, actuals.chat),
        phone: MetricReview::of(targets.phone, actuals.phone),
        email: MetricReview::of(targets.email, actuals.email),
        retargeting_contacts: MetricReview::of(targets.retargeting, actuals.retargeting_contacts),
        existing_contacts: MetricReview::of(targets.existing, actuals.existing_contacts),
        retargeting_customers: MetricReview::of(
            targets.retargeting_customers,
            actual_retargeting_customers,
        ),
        activity_total: MetricReview::of(targets.channel_total(), actuals.channel_total()),
    }
}

fn monthly_metrics(targets: &MonthlyTargets, actuals: &ActualSnapshot) -> MonthlyReview {
    MonthlyReview {
        revenue: MetricReview::of(targets.revenue, actuals.total_sales()),
        new_revenue: MetricReview::of(targets.new_revenue, actuals.new_sales),
        contracts: MetricReview::of(targets.contracts, actuals.total_contracts()),
        new_contracts: MetricReview::of(targets.new_contracts, actuals.new_contracts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::repository::{ActivitiesRepository, SalesRepository};
    use crate::models::Tier;
    use pretty_assertions::assert_eq;

    async fn setup() -> Database {
        let config = DatabaseConfig {
            url: ":memory:".to_string(),
            auth_token: None,
            local_path: None,
        };
        Database::new(&config).await.unwrap()
    }

    fn service(db: &Database) -> ReviewService {
        ReviewService::new(db.clone(), ActualsAggregator::new(db.clone()))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 29).unwrap() // week 35
    }

    #[tokio::test]
    async fn weekly_review_computes_rates_from_targets_and_actuals() {
        let db = setup().await;
        let conn = db.connect().unwrap();
        let user = UsersRepository::create(&conn, "佐藤", "marketer").await.unwrap();

        let period = Period::current(today(), PeriodUnit::Weekly);
        TargetsRepository::upsert(
            &conn,
            &user.id,
            period,
            &TargetFields::Weekly(WeeklyTargets { form: 5, dm: 3, ..Default::default() }),
            None,
        )
        .await
        .unwrap();

        let span = period.span();
        for _ in 0..5 {
            ActivitiesRepository::record(&conn, "佐藤", "new", Some("form"), span.start)
                .await
                .unwrap();
        }
        ActivitiesRepository::record(&conn, "佐藤", "new", Some("dm"), span.start)
            .await
            .unwrap();

        let review = service(&db)
            .build(PeriodUnit::Weekly, 0, Some(&user.id), today())
            .await
            .unwrap();

        assert_eq!(review.week_or_month, 35);
        assert_eq!(review.entries.len(), 1);

        let entry = &review.entries[0];
        assert!(entry.editable);
        match &entry.metrics {
            ReviewMetrics::Weekly(w) => {
                assert_eq!(w.form.rate, 100);
                assert_eq!(w.form.status, Tier::OnTrack);
                assert_eq!(w.dm.rate, 33);
                assert_eq!(w.dm.status, Tier::Behind);
                assert_eq!(w.activity_total.target, 8);
                assert_eq!(w.activity_total.actual, 6);
            }
            ReviewMetrics::Monthly(_) => panic!("expected weekly metrics"),
        }
    }

    #[tokio::test]
    async fn monthly_review_uses_revenue_and_contract_metrics() {
        let db = setup().await;
        let conn = db.connect().unwrap();
        let user = UsersRepository::create(&conn, "阿部", "marketer").await.unwrap();

        let period = Period::current(today(), PeriodUnit::Monthly);
        TargetsRepository::upsert(
            &conn,
            &user.id,
            period,
            &TargetFields::Monthly(MonthlyTargets {
                revenue: 200_000,
                new_revenue: 100_000,
                contracts: 2,
                new_contracts: 1,
            }),
            None,
        )
        .await
        .unwrap();

        SalesRepository::record(&conn, &user.id, "new", 100_000, today())
            .await
            .unwrap();
        SalesRepository::record(&conn, &user.id, "renewal", 60_000, today())
            .await
            .unwrap();

        let review = service(&db)
            .build(PeriodUnit::Monthly, 0, Some(&user.id), today())
            .await
            .unwrap();

        match &review.entries[0].metrics {
            ReviewMetrics::Monthly(m) => {
                assert_eq!(m.revenue.actual, 160_000);
                assert_eq!(m.revenue.rate, 80);
                assert_eq!(m.new_revenue.rate, 100);
                assert_eq!(m.contracts.actual, 2);
            }
            ReviewMetrics::Weekly(_) => panic!("expected monthly metrics"),
        }
    }

    #[tokio::test]
    async fn past_periods_are_read_only_and_missing_targets_rate_zero() {
        let db = setup().await;
        let conn = db.connect().unwrap();
        let user = UsersRepository::create(&conn, "佐藤", "marketer").await.unwrap();

        // Two weeks back: outside the edit window, and no target stored.
        let review = service(&db)
            .build(PeriodUnit::Weekly, 2, Some(&user.id), today())
            .await
            .unwrap();

        assert_eq!(review.week_or_month, 33);
        let entry = &review.entries[0];
        assert!(!entry.editable);
        match &entry.metrics {
            ReviewMetrics::Weekly(w) => {
                assert_eq!(w.form.target, 0);
                assert_eq!(w.form.rate, 0);
            }
            ReviewMetrics::Monthly(_) => panic!("expected weekly metrics"),
        }
    }

    #[tokio::test]
    async fn anonymous_requests_see_all_rows_read_only() {
        let db = setup().await;
        let conn = db.connect().unwrap();
        UsersRepository::create(&conn, "佐藤", "marketer").await.unwrap();

        let review = service(&db)
            .build(PeriodUnit::Weekly, 0, None, today())
            .await
            .unwrap();
        assert!(!review.entries[0].editable);
    }
}

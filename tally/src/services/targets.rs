//! Target writes and the bulk forward-application.

use chrono::NaiveDate;

use crate::db::repository::{TargetsRepository, UsersRepository};
use crate::db::Database;
use crate::error::{Result, TallyError};
use crate::models::{Period, PeriodUnit, TargetFields, TargetRecord};

use super::authorizer;

#[derive(Clone)]
pub struct TargetsService {
    db: Database,
}

impl TargetsService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_for_period(
        &self,
        unit: PeriodUnit,
        year: i32,
        index: i32,
    ) -> Result<Vec<TargetRecord>> {
        let conn = self.db.connect()?;
        TargetsRepository::list_for_period(&conn, unit, year, index).await
    }

    /// Upsert one target row, enforcing the edit window for the
    /// requesting user.
    pub async fn upsert(
        &self,
        requesting_user: &str,
        user_id: &str,
        period: Period,
        fields: &TargetFields,
        actual_retargeting_customers: Option<i64>,
        today: NaiveDate,
    ) -> Result<TargetRecord> {
        authorizer::require_edit_allowed(requesting_user, user_id, period, today)?;

        let conn = self.db.connect()?;
        if UsersRepository::get(&conn, user_id).await?.is_none() {
            return Err(TallyError::NotFound(format!("user {user_id} not found")));
        }

        TargetsRepository::upsert(&conn, user_id, period, fields, actual_retargeting_customers)
            .await
    }

    /// Apply the same target values to `count` consecutive periods
    /// starting at the current one, carrying years forward. Actual-side
    /// fields are reset to zero on every written period.
    ///
    /// Only the requesting user's own targets can be bulk-applied; the
    /// starting period is the current one by construction, so the write
    /// never reaches back into frozen history.
    pub async fn bulk_apply(
        &self,
        requesting_user: &str,
        user_id: &str,
        fields: &TargetFields,
        count: u32,
        today: NaiveDate,
    ) -> Result<Vec<TargetRecord>> {
        if requesting_user != user_id {
            return Err(TallyError::Forbidden(
                "targets can only be edited by their owner".to_string(),
            ));
        }
        let unit = fields.unit();
        if count == 0 || count > unit.capacity() as u32 {
            return Err(TallyError::Validation(format!(
                "count must be between 1 and {}",
                unit.capacity()
            )));
        }

        let conn = self.db.connect()?;
        if UsersRepository::get(&conn, user_id).await?.is_none() {
            return Err(TallyError::NotFound(format!("user {user_id} not found")));
        }

        let start = Period::current(today, unit);
        let mut written = Vec::with_capacity(count as usize);
        for step in 0..count as i32 {
            let period = start.advance(step);
            let record =
                TargetsRepository::upsert(&conn, user_id, period, fields, Some(0)).await?;
            written.push(record);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::models::WeeklyTargets;
    use pretty_assertions::assert_eq;

    async fn setup() -> (Database, String) {
        let config = DatabaseConfig {
            url: ":memory:".to_string(),
            auth_token: None,
            local_path: None,
        };
        let db = Database::new(&config).await.unwrap();
        let conn = db.connect().unwrap();
        let user = UsersRepository::create(&conn, "佐藤", "marketer").await.unwrap();
        (db, user.id)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, 15).unwrap() // week 51
    }

    fn weekly(form: i64) -> TargetFields {
        TargetFields::Weekly(WeeklyTargets { form, ..Default::default() })
    }

    #[tokio::test]
    async fn upsert_rejects_out_of_window_period() {
        let (db, user_id) = setup().await;
        let service = TargetsService::new(db);

        let frozen = Period::new(2026, PeriodUnit::Weekly, 40);
        let err = service
            .upsert(&user_id, &user_id, frozen, &weekly(5), None, today())
            .await
            .unwrap_err();
        assert!(matches!(err, TallyError::Forbidden(_)));

        // Nothing was written.
        let rows = service
            .list_for_period(PeriodUnit::Weekly, 2026, 40)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn upsert_rejects_cross_user_write() {
        let (db, user_id) = setup().await;
        let conn = db.connect().unwrap();
        let other = UsersRepository::create(&conn, "阿部", "marketer").await.unwrap();
        let service = TargetsService::new(db);

        let current = Period::current(today(), PeriodUnit::Weekly);
        let err = service
            .upsert(&user_id, &other.id, current, &weekly(5), None, today())
            .await
            .unwrap_err();
        assert!(matches!(err, TallyError::Forbidden(_)));
    }

    #[tokio::test]
    async fn bulk_apply_carries_into_the_next_year() {
        let (db, user_id) = setup().await;
        let service = TargetsService::new(db);

        // Week 51 of 2026 + 4 periods: 51, 52, then 1 and 2 of 2027.
        let written = service
            .bulk_apply(&user_id, &user_id, &weekly(7), 4, today())
            .await
            .unwrap();

        let periods: Vec<(i32, i32)> =
            written.iter().map(|r| (r.year, r.week_or_month)).collect();
        assert_eq!(periods, vec![(2026, 51), (2026, 52), (2027, 1), (2027, 2)]);

        for record in &written {
            match record.fields {
                TargetFields::Weekly(w) => assert_eq!(w.form, 7),
                TargetFields::Monthly(_) => panic!("expected weekly fields"),
            }
            assert_eq!(record.actual_retargeting_customers, 0);
        }
    }

    #[tokio::test]
    async fn bulk_apply_resets_manual_actuals() {
        let (db, user_id) = setup().await;
        let service = TargetsService::new(db);
        let current = Period::current(today(), PeriodUnit::Weekly);

        service
            .upsert(&user_id, &user_id, current, &weekly(3), Some(9), today())
            .await
            .unwrap();

        let written = service
            .bulk_apply(&user_id, &user_id, &weekly(3), 1, today())
            .await
            .unwrap();
        assert_eq!(written[0].actual_retargeting_customers, 0);
    }

    #[tokio::test]
    async fn bulk_apply_validates_count() {
        let (db, user_id) = setup().await;
        let service = TargetsService::new(db);

        let err = service
            .bulk_apply(&user_id, &user_id, &weekly(1), 0, today())
            .await
            .unwrap_err();
        assert!(matches!(err, TallyError::Validation(_)));

        let err = service
            .bulk_apply(&user_id, &user_id, &weekly(1), 53, today())
            .await
            .unwrap_err();
        assert!(matches!(err, TallyError::Validation(_)));
    }
}

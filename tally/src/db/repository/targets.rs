use chrono::{DateTime, Utc};
use libsql::{params, Connection};
use nanoid::nanoid;

use crate::error::Result;
use crate::models::{
    MonthlyTargets, Period, PeriodUnit, TargetFields, TargetRecord, WeeklyTargets,
};

pub struct TargetsRepository;

impl TargetsRepository {
    /// Insert or update the target row for (user, period).
    ///
    /// The variant of `fields` decides which columns carry values; the
    /// other side of the wide row is written as zero. When
    /// `actual_retargeting_customers` is `None` an existing manual actual
    /// is preserved; `Some(v)` overwrites it (bulk application passes
    /// `Some(0)` to reset).
    pub async fn upsert(
        conn: &Connection,
        user_id: &str,
        period: Period,
        fields: &TargetFields,
        actual_retargeting_customers: Option<i64>,
    ) -> Result<TargetRecord> {
        let id = nanoid!();
        let updated_at = Utc::now();

        let (weekly, monthly) = match fields {
            TargetFields::Weekly(w) => (*w, MonthlyTargets::default()),
            TargetFields::Monthly(m) => (WeeklyTargets::default(), *m),
        };

        conn.execute(
            r#"
            INSERT INTO user_targets (
                id, user_id, period_type, year, week_or_month,
                target_form, target_dm, target_chat, target_phone, target_email,
                target_retargeting, target_existing, target_retargeting_customers,
                actual_retargeting_customers,
                target_revenue, target_new_revenue, target_contracts, target_new_contracts,
                updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13,
                COALESCE(?14, 0),
                ?15, ?16, ?17, ?18,
                ?19
            )
            ON CONFLICT (user_id, period_type, year, week_or_month) DO UPDATE SET
                target_form = excluded.target_form,
                target_dm = excluded.target_dm,
                target_chat = excluded.target_chat,
                target_phone = excluded.target_phone,
                target_email = excluded.target_email,
                target_retargeting = excluded.target_retargeting,
                target_existing = excluded.target_existing,
                target_retargeting_customers = excluded.target_retargeting_customers,
                actual_retargeting_customers =
                    COALESCE(?14, user_targets.actual_retargeting_customers),
                target_revenue = excluded.target_revenue,
                target_new_revenue = excluded.target_new_revenue,
                target_contracts = excluded.target_contracts,
                target_new_contracts = excluded.target_new_contracts,
                updated_at = excluded.updated_at
            "#,
            params![
                id,
                user_id,
                period.unit.as_str(),
                period.year,
                period.index,
                weekly.form,
                weekly.dm,
                weekly.chat,
                weekly.phone,
                weekly.email,
                weekly.retargeting,
                weekly.existing,
                weekly.retargeting_customers,
                actual_retargeting_customers,
                monthly.revenue,
                monthly.new_revenue,
                monthly.contracts,
                monthly.new_contracts,
                updated_at.to_rfc3339(),
            ],
        )
        .await?;

        match Self::find(conn, user_id, period).await? {
            Some(record) => Ok(record),
            None => Err(crate::error::TallyError::Internal(
                "target row missing after upsert".to_string(),
            )),
        }
    }

    pub async fn find(
        conn: &Connection,
        user_id: &str,
        period: Period,
    ) -> Result<Option<TargetRecord>> {
        let mut rows = conn
            .query(
                &format!("{SELECT_TARGETS} WHERE t.user_id = ?1 AND t.period_type = ?2 AND t.year = ?3 AND t.week_or_month = ?4"),
                params![user_id, period.unit.as_str(), period.year, period.index],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    /// All marketer target rows for one period, ordered by display name.
    pub async fn list_for_period(
        conn: &Connection,
        unit: PeriodUnit,
        year: i32,
        index: i32,
    ) -> Result<Vec<TargetRecord>> {
        let mut rows = conn
            .query(
                &format!(
                    r#"{SELECT_TARGETS}
                    WHERE t.period_type = ?1 AND t.year = ?2 AND t.week_or_month = ?3
                      AND u.role = 'marketer'
                    ORDER BY u.name ASC"#
                ),
                params![unit.as_str(), year, index],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_record(&row)?);
        }

        Ok(results)
    }

    fn row_to_record(row: &libsql::Row) -> Result<TargetRecord> {
        let period_type: String = row.get(3)?;
        let fields = match period_type.as_str() {
            "monthly" => TargetFields::Monthly(MonthlyTargets {
                revenue: row.get(14)?,
                new_revenue: row.get(15)?,
                contracts: row.get(16)?,
                new_contracts: row.get(17)?,
            }),
            _ => TargetFields::Weekly(WeeklyTargets {
                form: row.get(6)?,
                dm: row.get(7)?,
                chat: row.get(8)?,
                phone: row.get(9)?,
                email: row.get(10)?,
                retargeting: row.get(11)?,
                existing: row.get(12)?,
                retargeting_customers: row.get(13)?,
            }),
        };

        Ok(TargetRecord {
            id: row.get(0)?,
            user_id: row.get(1)?,
            user_name: row.get(2)?,
            year: row.get(4)?,
            week_or_month: row.get(5)?,
            fields,
            actual_retargeting_customers: row.get(18)?,
            updated_at: DateTime::parse_from_rfc3339(&row.get::<String>(19)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

const SELECT_TARGETS: &str = r#"
    SELECT
        t.id, t.user_id, u.name, t.period_type, t.year, t.week_or_month,
        t.target_form, t.target_dm, t.target_chat, t.target_phone, t.target_email,
        t.target_retargeting, t.target_existing, t.target_retargeting_customers,
        t.target_revenue, t.target_new_revenue, t.target_contracts, t.target_new_contracts,
        t.actual_retargeting_customers, t.updated_at
    FROM user_targets t
    JOIN users u ON u.id = t.user_id
"#;

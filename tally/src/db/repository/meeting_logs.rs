use chrono::{DateTime, Utc};
use libsql::{params, Connection};
use nanoid::nanoid;

use crate::error::Result;
use crate::models::{MeetingLog, Period, PeriodUnit};

pub struct MeetingLogsRepository;

impl MeetingLogsRepository {
    /// Insert or overwrite the log for (user, meeting type, period). The
    /// stored snapshot is replaced wholesale on resave.
    pub async fn upsert(
        conn: &Connection,
        user_id: &str,
        period: Period,
        reflection: &str,
        action_plan: &str,
        snapshot: &serde_json::Value,
    ) -> Result<MeetingLog> {
        let id = nanoid!();
        let updated_at = Utc::now();
        let snapshot_json = serde_json::to_string(snapshot)?;

        conn.execute(
            r#"
            INSERT INTO meeting_logs (
                id, user_id, meeting_type, year, week_or_month,
                reflection, action_plan, snapshot_data, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT (user_id, meeting_type, year, week_or_month) DO UPDATE SET
                reflection = excluded.reflection,
                action_plan = excluded.action_plan,
                snapshot_data = excluded.snapshot_data,
                updated_at = excluded.updated_at
            "#,
            params![
                id,
                user_id,
                period.unit.as_str(),
                period.year,
                period.index,
                reflection,
                action_plan,
                snapshot_json,
                updated_at.to_rfc3339(),
            ],
        )
        .await?;

        match Self::find(conn, user_id, period).await? {
            Some(log) => Ok(log),
            None => Err(crate::error::TallyError::Internal(
                "meeting log missing after upsert".to_string(),
            )),
        }
    }

    pub async fn find(
        conn: &Connection,
        user_id: &str,
        period: Period,
    ) -> Result<Option<MeetingLog>> {
        let mut rows = conn
            .query(
                &format!("{SELECT_LOGS} WHERE l.user_id = ?1 AND l.meeting_type = ?2 AND l.year = ?3 AND l.week_or_month = ?4"),
                params![user_id, period.unit.as_str(), period.year, period.index],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_log(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_for_period(
        conn: &Connection,
        unit: PeriodUnit,
        year: i32,
        index: i32,
    ) -> Result<Vec<MeetingLog>> {
        let mut rows = conn
            .query(
                &format!(
                    r#"{SELECT_LOGS}
                    WHERE l.meeting_type = ?1 AND l.year = ?2 AND l.week_or_month = ?3
                    ORDER BY u.name ASC"#
                ),
                params![unit.as_str(), year, index],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_log(&row)?);
        }

        Ok(results)
    }

    fn row_to_log(row: &libsql::Row) -> Result<MeetingLog> {
        let meeting_type: String = row.get(3)?;
        let snapshot_raw: String = row.get(8)?;

        Ok(MeetingLog {
            id: row.get(0)?,
            user_id: row.get(1)?,
            user_name: row.get(2)?,
            meeting_type: meeting_type
                .parse()
                .unwrap_or(PeriodUnit::Weekly),
            year: row.get(4)?,
            week_or_month: row.get(5)?,
            reflection: row.get(6)?,
            action_plan: row.get(7)?,
            snapshot: serde_json::from_str(&snapshot_raw)
                .unwrap_or(serde_json::Value::Null),
            updated_at: DateTime::parse_from_rfc3339(&row.get::<String>(9)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

const SELECT_LOGS: &str = r#"
    SELECT
        l.id, l.user_id, u.name, l.meeting_type, l.year, l.week_or_month,
        l.reflection, l.action_plan, l.snapshot_data, l.updated_at
    FROM meeting_logs l
    JOIN users u ON u.id = l.user_id
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::users::UsersRepository;
    use crate::db::test_support::setup_test_db;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn resave_overwrites_text_and_snapshot() {
        let conn = setup_test_db().await;
        let user = UsersRepository::create(&conn, "佐藤", "marketer").await.unwrap();
        let period = Period::new(2026, PeriodUnit::Weekly, 35);

        MeetingLogsRepository::upsert(
            &conn,
            &user.id,
            period,
            "reached 3 of 5",
            "follow up monday",
            &json!({"form": 3}),
        )
        .await
        .unwrap();

        let updated = MeetingLogsRepository::upsert(
            &conn,
            &user.id,
            period,
            "reached 5 of 5",
            "hold pace",
            &json!({"form": 5}),
        )
        .await
        .unwrap();

        assert_eq!(updated.reflection, "reached 5 of 5");
        assert_eq!(updated.snapshot["form"], 5);

        let all = MeetingLogsRepository::list_for_period(&conn, PeriodUnit::Weekly, 2026, 35)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn weekly_and_monthly_logs_are_distinct_rows() {
        let conn = setup_test_db().await;
        let user = UsersRepository::create(&conn, "阿部", "marketer").await.unwrap();

        MeetingLogsRepository::upsert(
            &conn,
            &user.id,
            Period::new(2026, PeriodUnit::Weekly, 8),
            "w",
            "",
            &json!({}),
        )
        .await
        .unwrap();

        MeetingLogsRepository::upsert(
            &conn,
            &user.id,
            Period::new(2026, PeriodUnit::Monthly, 8),
            "m",
            "",
            &json!({}),
        )
        .await
        .unwrap();

        let weekly = MeetingLogsRepository::find(&conn, &user.id, Period::new(2026, PeriodUnit::Weekly, 8))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(weekly.reflection, "w");

        let monthly = MeetingLogsRepository::find(&conn, &user.id, Period::new(2026, PeriodUnit::Monthly, 8))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(monthly.reflection, "m");
        assert_eq!(monthly.meeting_type, PeriodUnit::Monthly);
    }
}

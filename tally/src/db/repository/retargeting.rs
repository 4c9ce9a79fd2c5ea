use chrono::NaiveDate;
use libsql::{params, Connection};
use nanoid::nanoid;

use crate::error::Result;
use crate::models::naming::names_match;
use crate::models::RetargetingAlert;

pub struct RetargetingRepository;

impl RetargetingRepository {
    pub async fn track(
        conn: &Connection,
        company_name: &str,
        manager_name: &str,
        next_contact_date: Option<NaiveDate>,
    ) -> Result<String> {
        let id = nanoid!();
        conn.execute(
            r#"
            INSERT INTO retargeting_customers (id, company_name, manager_name, status, next_contact_date)
            VALUES (?1, ?2, ?3, 'active', ?4)
            "#,
            params![
                id.clone(),
                company_name,
                manager_name,
                next_contact_date.map(|d| d.format("%Y-%m-%d").to_string()),
            ],
        )
        .await?;
        Ok(id)
    }

    /// Bucket one manager's active retargeting customers by due date:
    /// before `today` is overdue, through `week_end` is due this week,
    /// later is upcoming. Customers without a due date are not alerted.
    pub async fn alert_for_manager(
        conn: &Connection,
        manager_name: &str,
        today: NaiveDate,
        week_end: NaiveDate,
    ) -> Result<RetargetingAlert> {
        let due_dates = Self::due_dates(conn).await?;

        let mut alert = RetargetingAlert::default();
        for (stored_name, due) in due_dates {
            if !names_match(&stored_name, manager_name) {
                continue;
            }
            Self::bucket(&mut alert, due, today, week_end);
        }
        Ok(alert)
    }

    /// Bucket every active retargeting customer regardless of manager.
    pub async fn alert_overall(
        conn: &Connection,
        today: NaiveDate,
        week_end: NaiveDate,
    ) -> Result<RetargetingAlert> {
        let due_dates = Self::due_dates(conn).await?;

        let mut alert = RetargetingAlert::default();
        for (_, due) in due_dates {
            Self::bucket(&mut alert, due, today, week_end);
        }
        Ok(alert)
    }

    async fn due_dates(conn: &Connection) -> Result<Vec<(String, NaiveDate)>> {
        let mut rows = conn
            .query(
                r#"
                SELECT manager_name, next_contact_date
                FROM retargeting_customers
                WHERE status = 'active' AND next_contact_date IS NOT NULL
                "#,
                (),
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            let name: String = row.get(0)?;
            let raw: String = row.get(1)?;
            if let Ok(due) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                results.push((name, due));
            }
        }
        Ok(results)
    }

    fn bucket(alert: &mut RetargetingAlert, due: NaiveDate, today: NaiveDate, week_end: NaiveDate) {
        if due < today {
            alert.overdue += 1;
        } else if due <= week_end {
            alert.due_this_week += 1;
        } else {
            alert.upcoming += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_test_db;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn due_dates_bucket_relative_to_today_and_week_end() {
        let conn = setup_test_db().await;
        let today = date(2026, 8, 27);
        let week_end = date(2026, 8, 30);

        RetargetingRepository::track(&conn, "acme", "佐藤", Some(date(2026, 8, 20)))
            .await
            .unwrap();
        RetargetingRepository::track(&conn, "globex", "佐藤", Some(date(2026, 8, 27)))
            .await
            .unwrap();
        RetargetingRepository::track(&conn, "initech", "佐藤", Some(date(2026, 8, 30)))
            .await
            .unwrap();
        RetargetingRepository::track(&conn, "hooli", "佐藤", Some(date(2026, 9, 15)))
            .await
            .unwrap();
        // No due date: never alerted.
        RetargetingRepository::track(&conn, "umbrella", "佐藤", None)
            .await
            .unwrap();

        let alert = RetargetingRepository::alert_for_manager(&conn, "佐藤", today, week_end)
            .await
            .unwrap();
        assert_eq!(
            alert,
            RetargetingAlert {
                overdue: 1,
                due_this_week: 2,
                upcoming: 1
            }
        );
    }

    #[tokio::test]
    async fn manager_filter_uses_lookalike_matching() {
        let conn = setup_test_db().await;
        let today = date(2026, 8, 27);
        let week_end = date(2026, 8, 30);

        RetargetingRepository::track(&conn, "acme", "\u{FA11}田", Some(date(2026, 8, 20)))
            .await
            .unwrap();
        RetargetingRepository::track(&conn, "other", "阿部", Some(date(2026, 8, 20)))
            .await
            .unwrap();

        let alert =
            RetargetingRepository::alert_for_manager(&conn, "\u{5D0E}田", today, week_end)
                .await
                .unwrap();
        assert_eq!(alert.overdue, 1);
        assert_eq!(alert.due_this_week + alert.upcoming, 0);

        let overall = RetargetingRepository::alert_overall(&conn, today, week_end)
            .await
            .unwrap();
        assert_eq!(overall.overdue, 2);
    }
}

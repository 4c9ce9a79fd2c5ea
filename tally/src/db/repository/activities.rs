use chrono::NaiveDate;
use libsql::{params, Connection};
use nanoid::nanoid;

use crate::error::Result;
use crate::models::naming::{self, canonical};
use crate::models::DateSpan;

/// Per-manager activity counts over one date span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerActivity {
    pub manager_name: String,
    pub form: i64,
    pub dm: i64,
    pub chat: i64,
    pub phone: i64,
    pub email: i64,
    pub retargeting_contacts: i64,
    pub existing_contacts: i64,
}

impl ManagerActivity {
    pub fn channel_total(&self) -> i64 {
        self.form + self.dm + self.chat + self.phone + self.email
    }
}

pub struct ActivitiesRepository;

impl ActivitiesRepository {
    pub async fn record(
        conn: &Connection,
        manager_name: &str,
        category: &str,
        channel: Option<&str>,
        activity_date: NaiveDate,
    ) -> Result<String> {
        let id = nanoid!();
        conn.execute(
            r#"
            INSERT INTO sales_activities (id, manager_name, category, channel, activity_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                id.clone(),
                manager_name,
                category,
                channel,
                activity_date.format("%Y-%m-%d").to_string(),
            ],
        )
        .await?;
        Ok(id)
    }

    /// Activity counts for one manager's display name within the span.
    ///
    /// Historical rows may carry a look-alike spelling of the name in
    /// either direction, so both the stored column and the queried name
    /// are folded to their canonical form before comparing.
    pub async fn counts_for_manager(
        conn: &Connection,
        name: &str,
        span: DateSpan,
    ) -> Result<ManagerActivity> {
        let mut rows = conn
            .query(
                &format!(
                    "{COUNTS_SELECT} WHERE {} = ?1 AND activity_date >= ?2 AND activity_date <= ?3",
                    naming::fold_sql("manager_name")
                ),
                params![
                    canonical(name),
                    span.start.format("%Y-%m-%d").to_string(),
                    span.end.format("%Y-%m-%d").to_string(),
                ],
            )
            .await?;

        match rows.next().await? {
            Some(row) => {
                let mut activity = Self::row_to_counts(&row)?;
                activity.manager_name = name.to_string();
                Ok(activity)
            }
            None => Ok(ManagerActivity {
                manager_name: name.to_string(),
                ..Default::default()
            }),
        }
    }

    /// Activity counts within the span grouped by the manager name as
    /// stored. Callers resolve stored names to users themselves.
    pub async fn counts_by_manager(
        conn: &Connection,
        span: DateSpan,
    ) -> Result<Vec<ManagerActivity>> {
        let mut rows = conn
            .query(
                &format!(
                    r#"SELECT manager_name, {COUNT_COLUMNS}
                    FROM sales_activities
                    WHERE activity_date >= ?1 AND activity_date <= ?2
                    GROUP BY manager_name
                    ORDER BY manager_name ASC"#
                ),
                params![
                    span.start.format("%Y-%m-%d").to_string(),
                    span.end.format("%Y-%m-%d").to_string(),
                ],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            let name: String = row.get(0)?;
            let mut activity = Self::grouped_row_to_counts(&row)?;
            activity.manager_name = name;
            results.push(activity);
        }

        Ok(results)
    }

    fn row_to_counts(row: &libsql::Row) -> Result<ManagerActivity> {
        Ok(ManagerActivity {
            manager_name: String::new(),
            form: row.get(0)?,
            dm: row.get(1)?,
            chat: row.get(2)?,
            phone: row.get(3)?,
            email: row.get(4)?,
            retargeting_contacts: row.get(5)?,
            existing_contacts: row.get(6)?,
        })
    }

    fn grouped_row_to_counts(row: &libsql::Row) -> Result<ManagerActivity> {
        Ok(ManagerActivity {
            manager_name: String::new(),
            form: row.get(1)?,
            dm: row.get(2)?,
            chat: row.get(3)?,
            phone: row.get(4)?,
            email: row.get(5)?,
            retargeting_contacts: row.get(6)?,
            existing_contacts: row.get(7)?,
        })
    }
}

const COUNT_COLUMNS: &str = r#"
    COALESCE(SUM(CASE WHEN category = 'new' AND channel = 'form' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN category = 'new' AND channel = 'dm' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN category = 'new' AND channel = 'chat' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN category = 'new' AND channel = 'phone' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN category = 'new' AND channel = 'email' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN category = 'retargeting' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN category = 'existing' THEN 1 ELSE 0 END), 0)
"#;

const COUNTS_SELECT: &str = r#"
    SELECT
    COALESCE(SUM(CASE WHEN category = 'new' AND channel = 'form' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN category = 'new' AND channel = 'dm' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN category = 'new' AND channel = 'chat' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN category = 'new' AND channel = 'phone' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN category = 'new' AND channel = 'email' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN category = 'retargeting' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN category = 'existing' THEN 1 ELSE 0 END), 0)
    FROM sales_activities
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_test_db;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn span(start: NaiveDate, end: NaiveDate) -> DateSpan {
        DateSpan { start, end }
    }

    #[tokio::test]
    async fn counts_split_by_channel_and_category() {
        let conn = setup_test_db().await;
        let day = date(2026, 8, 25);

        for _ in 0..3 {
            ActivitiesRepository::record(&conn, "佐藤", "new", Some("form"), day)
                .await
                .unwrap();
        }
        ActivitiesRepository::record(&conn, "佐藤", "new", Some("phone"), day)
            .await
            .unwrap();
        ActivitiesRepository::record(&conn, "佐藤", "retargeting", None, day)
            .await
            .unwrap();
        // Outside the span.
        ActivitiesRepository::record(&conn, "佐藤", "new", Some("form"), date(2026, 9, 1))
            .await
            .unwrap();

        let counts = ActivitiesRepository::counts_for_manager(
            &conn,
            "佐藤",
            span(date(2026, 8, 24), date(2026, 8, 30)),
        )
        .await
        .unwrap();

        assert_eq!(counts.form, 3);
        assert_eq!(counts.phone, 1);
        assert_eq!(counts.retargeting_contacts, 1);
        assert_eq!(counts.channel_total(), 4);
    }

    #[tokio::test]
    async fn lookalike_spelling_is_counted_for_the_same_manager() {
        let conn = setup_test_db().await;
        let day = date(2026, 8, 25);

        // One row under the compatibility codepoint, one under the
        // canonical spelling.
        ActivitiesRepository::record(&conn, "\u{FA11}田", "new", Some("dm"), day)
            .await
            .unwrap();
        ActivitiesRepository::record(&conn, "\u{5D0E}田", "new", Some("dm"), day)
            .await
            .unwrap();

        // Either spelling in the query must find both rows.
        for query_name in ["\u{FA11}田", "\u{5D0E}田"] {
            let counts = ActivitiesRepository::counts_for_manager(
                &conn,
                query_name,
                span(date(2026, 8, 24), date(2026, 8, 30)),
            )
            .await
            .unwrap();

            assert_eq!(counts.dm, 2, "query under {query_name}");
        }
    }

    #[tokio::test]
    async fn counts_by_manager_groups_stored_names() {
        let conn = setup_test_db().await;
        let day = date(2026, 8, 25);

        ActivitiesRepository::record(&conn, "佐藤", "new", Some("form"), day)
            .await
            .unwrap();
        ActivitiesRepository::record(&conn, "阿部", "existing", None, day)
            .await
            .unwrap();

        let grouped = ActivitiesRepository::counts_by_manager(
            &conn,
            span(date(2026, 8, 24), date(2026, 8, 30)),
        )
        .await
        .unwrap();

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].manager_name, "佐藤");
        assert_eq!(grouped[0].form, 1);
        assert_eq!(grouped[1].existing_contacts, 1);
    }
}

use chrono::NaiveDate;
use libsql::{params, Connection};
use nanoid::nanoid;

use crate::error::Result;
use crate::models::DateSpan;

pub struct ContactHistoryRepository;

impl ContactHistoryRepository {
    pub async fn record(
        conn: &Connection,
        user_id: &str,
        customer_ref: &str,
        contact_date: NaiveDate,
    ) -> Result<String> {
        let id = nanoid!();
        conn.execute(
            r#"
            INSERT INTO contact_history (id, user_id, customer_ref, contact_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                id.clone(),
                user_id,
                customer_ref,
                contact_date.format("%Y-%m-%d").to_string(),
            ],
        )
        .await?;
        Ok(id)
    }

    /// Distinct customers one user touched within the span. Multiple
    /// contacts with the same customer count once.
    pub async fn unique_customers_for_user(
        conn: &Connection,
        user_id: &str,
        span: DateSpan,
    ) -> Result<i64> {
        let mut rows = conn
            .query(
                r#"
                SELECT COUNT(DISTINCT customer_ref)
                FROM contact_history
                WHERE user_id = ?1 AND contact_date >= ?2 AND contact_date <= ?3
                "#,
                params![
                    user_id,
                    span.start.format("%Y-%m-%d").to_string(),
                    span.end.format("%Y-%m-%d").to_string(),
                ],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(row.get(0)?),
            None => Ok(0),
        }
    }

    /// Distinct-customer counts for every user with rows in the span.
    pub async fn unique_customers_by_user(
        conn: &Connection,
        span: DateSpan,
    ) -> Result<Vec<(String, i64)>> {
        let mut rows = conn
            .query(
                r#"
                SELECT user_id, COUNT(DISTINCT customer_ref)
                FROM contact_history
                WHERE contact_date >= ?1 AND contact_date <= ?2
                GROUP BY user_id
                "#,
                params![
                    span.start.format("%Y-%m-%d").to_string(),
                    span.end.format("%Y-%m-%d").to_string(),
                ],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push((row.get(0)?, row.get(1)?));
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::users::UsersRepository;
    use crate::db::test_support::setup_test_db;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn repeat_contacts_with_one_customer_count_once() {
        let conn = setup_test_db().await;
        let user = UsersRepository::create(&conn, "佐藤", "marketer").await.unwrap();
        let span = DateSpan {
            start: date(2026, 8, 24),
            end: date(2026, 8, 30),
        };

        ContactHistoryRepository::record(&conn, &user.id, "acme", date(2026, 8, 24))
            .await
            .unwrap();
        ContactHistoryRepository::record(&conn, &user.id, "acme", date(2026, 8, 26))
            .await
            .unwrap();
        ContactHistoryRepository::record(&conn, &user.id, "acme", date(2026, 8, 28))
            .await
            .unwrap();

        let count = ContactHistoryRepository::unique_customers_for_user(&conn, &user.id, span)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn counts_are_bounded_by_the_span() {
        let conn = setup_test_db().await;
        let user = UsersRepository::create(&conn, "阿部", "marketer").await.unwrap();
        let span = DateSpan {
            start: date(2026, 8, 24),
            end: date(2026, 8, 30),
        };

        ContactHistoryRepository::record(&conn, &user.id, "acme", date(2026, 8, 24))
            .await
            .unwrap();
        ContactHistoryRepository::record(&conn, &user.id, "globex", date(2026, 9, 2))
            .await
            .unwrap();

        let by_user = ContactHistoryRepository::unique_customers_by_user(&conn, span)
            .await
            .unwrap();
        assert_eq!(by_user, vec![(user.id.clone(), 1)]);
    }
}

use chrono::NaiveDate;
use libsql::{params, Connection};
use nanoid::nanoid;

use crate::error::Result;
use crate::models::DateSpan;

/// Revenue and contract-count sums for one user over a span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesTotals {
    pub new_sales: i64,
    pub renewal_sales: i64,
    pub termination_sales: i64,
    pub new_contracts: i64,
    pub renewal_contracts: i64,
    pub termination_contracts: i64,
}

pub struct SalesRepository;

impl SalesRepository {
    pub async fn record(
        conn: &Connection,
        user_id: &str,
        sales_type: &str,
        amount: i64,
        contract_date: NaiveDate,
    ) -> Result<String> {
        let id = nanoid!();
        conn.execute(
            r#"
            INSERT INTO sales (id, user_id, sales_type, amount, contract_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                id.clone(),
                user_id,
                sales_type,
                amount,
                contract_date.format("%Y-%m-%d").to_string(),
            ],
        )
        .await?;
        Ok(id)
    }

    /// Sums for one user within the span, split by contract type.
    pub async fn totals_for_user(
        conn: &Connection,
        user_id: &str,
        span: DateSpan,
    ) -> Result<SalesTotals> {
        let mut rows = conn
            .query(
                r#"
                SELECT
                    COALESCE(SUM(CASE WHEN sales_type = 'new' THEN amount ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN sales_type = 'renewal' THEN amount ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN sales_type = 'termination' THEN amount ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN sales_type = 'new' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN sales_type = 'renewal' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN sales_type = 'termination' THEN 1 ELSE 0 END), 0)
                FROM sales
                WHERE user_id = ?1 AND contract_date >= ?2 AND contract_date <= ?3
                "#,
                params![
                    user_id,
                    span.start.format("%Y-%m-%d").to_string(),
                    span.end.format("%Y-%m-%d").to_string(),
                ],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(SalesTotals {
                new_sales: row.get(0)?,
                renewal_sales: row.get(1)?,
                termination_sales: row.get(2)?,
                new_contracts: row.get(3)?,
                renewal_contracts: row.get(4)?,
                termination_contracts: row.get(5)?,
            }),
            None => Ok(SalesTotals::default()),
        }
    }

    /// Sums within the span grouped by user id, joined with the owning
    /// user's display name. Users with no rows are absent.
    pub async fn totals_by_user(
        conn: &Connection,
        span: DateSpan,
    ) -> Result<Vec<(String, String, SalesTotals)>> {
        let mut rows = conn
            .query(
                r#"
                SELECT
                    s.user_id, u.name,
                    COALESCE(SUM(CASE WHEN s.sales_type = 'new' THEN s.amount ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN s.sales_type = 'renewal' THEN s.amount ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN s.sales_type = 'termination' THEN s.amount ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN s.sales_type = 'new' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN s.sales_type = 'renewal' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN s.sales_type = 'termination' THEN 1 ELSE 0 END), 0)
                FROM sales s
                JOIN users u ON u.id = s.user_id
                WHERE s.contract_date >= ?1 AND s.contract_date <= ?2
                GROUP BY s.user_id, u.name
                ORDER BY u.name ASC
                "#,
                params![
                    span.start.format("%Y-%m-%d").to_string(),
                    span.end.format("%Y-%m-%d").to_string(),
                ],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push((
                row.get(0)?,
                row.get(1)?,
                SalesTotals {
                    new_sales: row.get(2)?,
                    renewal_sales: row.get(3)?,
                    termination_sales: row.get(4)?,
                    new_contracts: row.get(5)?,
                    renewal_contracts: row.get(6)?,
                    termination_contracts: row.get(7)?,
                },
            ));
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
    async fn totals_split_by_contract_type() {
        let conn = setup_test_db().await;
        let user = UsersRepository::create(&conn, "佐藤", "marketer").await.unwrap();
        let span = DateSpan {
            start: date(2026, 8, 1),
            end: date(2026, 8, 31),
        };

        SalesRepository::record(&conn, &user.id, "new", 100_000, date(2026, 8, 5))
            .await
            .unwrap();
        SalesRepository::record(&conn, &user.id, "new", 200_000, date(2026, 8, 20))
            .await
            .unwrap();
        SalesRepository::record(&conn, &user.id, "renewal", 50_000, date(2026, 8, 12))
            .await
            .unwrap();
        SalesRepository::record(&conn, &user.id, "termination", 80_000, date(2026, 8, 15))
            .await
            .unwrap();
        // Outside the span.
        SalesRepository::record(&conn, &user.id, "new", 999_999, date(2026, 9, 1))
            .await
            .unwrap();

        let totals = SalesRepository::totals_for_user(&conn, &user.id, span)
            .await
            .unwrap();
        assert_eq!(totals.new_sales, 300_000);
        assert_eq!(totals.renewal_sales, 50_000);
        assert_eq!(totals.termination_sales, 80_000);
        assert_eq!(totals.new_contracts, 2);
        assert_eq!(totals.renewal_contracts, 1);
        assert_eq!(totals.termination_contracts, 1);
    }

    #[tokio::test]
    async fn totals_by_user_groups_rows() {
        let conn = setup_test_db().await;
        let a = UsersRepository::create(&conn, "佐藤", "marketer").await.unwrap();
        let b = UsersRepository::create(&conn, "阿部", "marketer").await.unwrap();
        let span = DateSpan {
            start: date(2026, 8, 1),
            end: date(2026, 8, 31),
        };

        SalesRepository::record(&conn, &a.id, "new", 10, date(2026, 8, 5))
            .await
            .unwrap();
        SalesRepository::record(&conn, &b.id, "renewal", 20, date(2026, 8, 6))
            .await
            .unwrap();

        let grouped = SalesRepository::totals_by_user(&conn, span).await.unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].1, "佐藤");
        assert_eq!(grouped[0].2.new_sales, 10);
        assert_eq!(grouped[1].2.renewal_sales, 20);
    }
}

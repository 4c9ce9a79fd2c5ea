use chrono::{DateTime, Utc};
use libsql::{params, Connection};
use nanoid::nanoid;

use crate::error::Result;
use crate::models::User;

pub struct UsersRepository;

impl UsersRepository {
    pub async fn create(conn: &Connection, name: &str, role: &str) -> Result<User> {
        let id = nanoid!();
        let created_at = Utc::now();

        conn.execute(
            r#"
            INSERT INTO users (id, name, role, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![id.clone(), name, role, created_at.to_rfc3339()],
        )
        .await?;

        Ok(User {
            id,
            name: name.to_string(),
            role: role.to_string(),
            created_at,
        })
    }

    pub async fn get(conn: &Connection, id: &str) -> Result<Option<User>> {
        let mut rows = conn
            .query(
                "SELECT id, name, role, created_at FROM users WHERE id = ?1",
                params![id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// All accounts that participate in target/review aggregation, ordered
    /// by display name for stable output.
    pub async fn list_marketers(conn: &Connection) -> Result<Vec<User>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, name, role, created_at
                FROM users
                WHERE role = 'marketer'
                ORDER BY name ASC
                "#,
                (),
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_user(&row)?);
        }

        Ok(results)
    }

    fn row_to_user(row: &libsql::Row) -> Result<User> {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            role: row.get(2)?,
            created_at: DateTime::parse_from_rfc3339(&row.get::<String>(3)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_test_db;

    #[tokio::test]
    async fn list_marketers_excludes_other_roles() {
        let conn = setup_test_db().await;

        UsersRepository::create(&conn, "佐藤", "marketer").await.unwrap();
        UsersRepository::create(&conn, "管理者", "admin").await.unwrap();
        UsersRepository::create(&conn, "阿部", "marketer").await.unwrap();

        let marketers = UsersRepository::list_marketers(&conn).await.unwrap();
        let names: Vec<&str> = marketers.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["佐藤", "阿部"]);
    }

    #[tokio::test]
    async fn get_returns_none_for_missing_id() {
        let conn = setup_test_db().await;
        assert!(UsersRepository::get(&conn, "nope").await.unwrap().is_none());
    }
}

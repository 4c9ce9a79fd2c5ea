use libsql::{Builder, Connection};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

pub struct Database {
    pub(crate) db: Arc<libsql::Database>,
    /// A `:memory:` database only exists on the connection that created
    /// it, so that single connection is kept and handed out to every
    /// caller; fresh connections would each see an empty database.
    pub(crate) memory_conn: Option<Connection>,
    pub(crate) busy_timeout_ms: u64,
    pub(crate) journal_mode: String,
    pub(crate) synchronous: String,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let busy_timeout_ms = std::env::var("DATABASE_BUSY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5000);
        let journal_mode = normalize_journal_mode(
            &std::env::var("DATABASE_JOURNAL_MODE").unwrap_or_else(|_| "WAL".to_string()),
        )
        .to_string();
        let synchronous = normalize_synchronous(
            &std::env::var("DATABASE_SYNCHRONOUS").unwrap_or_else(|_| "NORMAL".to_string()),
        )
        .to_string();

        let db = if config.url.starts_with("libsql://") || config.url.starts_with("https://") {
            if let Some(ref local_path) = config.local_path {
                Builder::new_remote_replica(
                    local_path,
                    config.url.clone(),
                    config.auth_token.clone().unwrap_or_default(),
                )
                .build()
                .await?
            } else {
                Builder::new_remote(
                    config.url.clone(),
                    config.auth_token.clone().unwrap_or_default(),
                )
                .build()
                .await?
            }
        } else if config.url == ":memory:" {
            Builder::new_local(":memory:").build().await?
        } else {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        };

        let db = Arc::new(db);
        let memory_conn = if config.url == ":memory:" {
            Some(db.connect()?)
        } else {
            None
        };

        let database = Self {
            db,
            memory_conn,
            busy_timeout_ms,
            journal_mode,
            synchronous,
        };
        database.configure_database().await?;
        database.init_schema().await?;

        Ok(database)
    }

    pub fn connect(&self) -> Result<Connection> {
        if let Some(conn) = &self.memory_conn {
            return Ok(conn.clone());
        }
        Ok(self.db.connect()?)
    }

    async fn configure_database(&self) -> Result<()> {
        let conn = self.connect()?;

        let busy_timeout_sql = format!("PRAGMA busy_timeout = {}", self.busy_timeout_ms);
        if let Err(error) = conn.execute_batch(&busy_timeout_sql).await {
            tracing::warn!(
                busy_timeout_ms = self.busy_timeout_ms,
                error = %error,
                "Failed to set SQLite busy_timeout"
            );
        }

        let journal_sql = format!("PRAGMA journal_mode = {}", self.journal_mode);
        if let Err(error) = conn.execute_batch(&journal_sql).await {
            tracing::warn!(
                mode = %self.journal_mode,
                error = %error,
                "Failed to set SQLite journal_mode"
            );
        }

        let synchronous_sql = format!("PRAGMA synchronous = {}", self.synchronous);
        if let Err(error) = conn.execute_batch(&synchronous_sql).await {
            tracing::warn!(
                mode = %self.synchronous,
                error = %error,
                "Failed to set SQLite synchronous pragma"
            );
        }

        Ok(())
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        schema::init_schema(&conn).await?;
        Ok(())
    }

    /// Probe the database with a trivial query.
    pub async fn ping(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.query("SELECT 1", ()).await?;
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            memory_conn: self.memory_conn.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode.clone(),
            synchronous: self.synchronous.clone(),
        }
    }
}

fn normalize_journal_mode(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "DELETE" => "DELETE",
        "TRUNCATE" => "TRUNCATE",
        "PERSIST" => "PERSIST",
        "MEMORY" => "MEMORY",
        "WAL" => "WAL",
        "OFF" => "OFF",
        _ => "WAL",
    }
}

fn normalize_synchronous(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "OFF" | "0" => "OFF",
        "NORMAL" | "1" => "NORMAL",
        "FULL" | "2" => "FULL",
        "EXTRA" | "3" => "EXTRA",
        _ => "NORMAL",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journal_mode_normalization_defaults_to_wal() {
        assert_eq!(normalize_journal_mode("wal"), "WAL");
        assert_eq!(normalize_journal_mode("delete"), "DELETE");
        assert_eq!(normalize_journal_mode("bogus"), "WAL");
    }

    #[test]
    fn synchronous_normalization_accepts_numeric_forms() {
        assert_eq!(normalize_synchronous("2"), "FULL");
        assert_eq!(normalize_synchronous("normal"), "NORMAL");
        assert_eq!(normalize_synchronous("unknown"), "NORMAL");
    }

    #[tokio::test]
    async fn in_memory_database_initializes_schema() {
        let config = DatabaseConfig {
            url: ":memory:".to_string(),
            auth_token: None,
            local_path: None,
        };
        let db = Database::new(&config).await.unwrap();
        db.ping().await.unwrap();

        let conn = db.connect().unwrap();
        let mut rows = conn
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name='user_targets'",
                (),
            )
            .await
            .unwrap();
        assert!(rows.next().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn separate_connects_share_the_in_memory_database() {
        let config = DatabaseConfig {
            url: ":memory:".to_string(),
            auth_token: None,
            local_path: None,
        };
        let db = Database::new(&config).await.unwrap();

        let writer = db.connect().unwrap();
        writer
            .execute(
                "INSERT INTO users (id, name, role, created_at) VALUES ('u1', '佐藤', 'marketer', '2026-08-29T00:00:00Z')",
                (),
            )
            .await
            .unwrap();

        // A later connect (including from a cloned handle) must see the
        // same database, not a fresh empty one.
        let reader = db.clone().connect().unwrap();
        let mut rows = reader
            .query("SELECT COUNT(*) FROM users", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }
}

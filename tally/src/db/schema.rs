use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Console accounts. Only role='marketer' rows participate in
        -- target/review aggregation.
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'marketer',
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);

        -- Per-period targets, one wide row per (user, period). Weekly rows
        -- use the channel/contact columns, monthly rows the revenue/contract
        -- columns; the unused side stays zero. Rows are upserted in place
        -- and never hard-deleted.
        CREATE TABLE IF NOT EXISTS user_targets (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            period_type TEXT NOT NULL,
            year INTEGER NOT NULL,
            week_or_month INTEGER NOT NULL,
            target_form INTEGER NOT NULL DEFAULT 0,
            target_dm INTEGER NOT NULL DEFAULT 0,
            target_chat INTEGER NOT NULL DEFAULT 0,
            target_phone INTEGER NOT NULL DEFAULT 0,
            target_email INTEGER NOT NULL DEFAULT 0,
            target_retargeting INTEGER NOT NULL DEFAULT 0,
            target_existing INTEGER NOT NULL DEFAULT 0,
            target_retargeting_customers INTEGER NOT NULL DEFAULT 0,
            actual_retargeting_customers INTEGER NOT NULL DEFAULT 0,
            target_revenue INTEGER NOT NULL DEFAULT 0,
            target_new_revenue INTEGER NOT NULL DEFAULT 0,
            target_contracts INTEGER NOT NULL DEFAULT 0,
            target_new_contracts INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL,
            UNIQUE (user_id, period_type, year, week_or_month),
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        CREATE INDEX IF NOT EXISTS idx_user_targets_period
            ON user_targets(period_type, year, week_or_month);

        -- Meeting review logs with a frozen JSON snapshot of the actuals
        -- at save time.
        CREATE TABLE IF NOT EXISTS meeting_logs (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            meeting_type TEXT NOT NULL,
            year INTEGER NOT NULL,
            week_or_month INTEGER NOT NULL,
            reflection TEXT NOT NULL DEFAULT '',
            action_plan TEXT NOT NULL DEFAULT '',
            snapshot_data TEXT NOT NULL DEFAULT '{}',
            updated_at TEXT NOT NULL,
            UNIQUE (user_id, meeting_type, year, week_or_month),
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        CREATE INDEX IF NOT EXISTS idx_meeting_logs_period
            ON meeting_logs(meeting_type, year, week_or_month);

        -- Contract revenue lines. sales_type is new|renewal|termination;
        -- termination amounts are reported but never added to revenue.
        CREATE TABLE IF NOT EXISTS sales (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            sales_type TEXT NOT NULL,
            amount INTEGER NOT NULL DEFAULT 0,
            contract_date TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        CREATE INDEX IF NOT EXISTS idx_sales_contract_date ON sales(contract_date);
        CREATE INDEX IF NOT EXISTS idx_sales_user_id ON sales(user_id);

        -- Outreach/follow-up activity lines, keyed by the manager's display
        -- name (the upstream data has no user id on these rows). category is
        -- new|retargeting|existing; channel is set on 'new' rows only.
        CREATE TABLE IF NOT EXISTS sales_activities (
            id TEXT PRIMARY KEY,
            manager_name TEXT NOT NULL,
            category TEXT NOT NULL,
            channel TEXT,
            activity_date TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sales_activities_date
            ON sales_activities(activity_date);
        CREATE INDEX IF NOT EXISTS idx_sales_activities_manager
            ON sales_activities(manager_name);

        -- Contact-history ledger for unique-customer counts.
        CREATE TABLE IF NOT EXISTS contact_history (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            customer_ref TEXT NOT NULL,
            contact_date TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        CREATE INDEX IF NOT EXISTS idx_contact_history_date
            ON contact_history(contact_date);

        -- Tracked retargeting customers with their next contact due date.
        CREATE TABLE IF NOT EXISTS retargeting_customers (
            id TEXT PRIMARY KEY,
            company_name TEXT NOT NULL DEFAULT '',
            manager_name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            next_contact_date TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_retargeting_customers_manager
            ON retargeting_customers(manager_name);
        "#,
    )
    .await?;

    Ok(())
}

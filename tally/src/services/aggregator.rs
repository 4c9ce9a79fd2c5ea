//! Actuals aggregation.
//!
//! Builds an [`ActualSnapshot`] per user and date span from the
//! transaction tables. Per-user lookups run concurrently and fail
//! independently: a user whose queries error gets an all-zero snapshot
//! and a logged warning, never aborting the batch.

use std::collections::HashMap;

use crate::db::repository::{ActivitiesRepository, ContactHistoryRepository, SalesRepository};
use crate::db::Database;
use crate::error::Result;
use crate::models::{ActualSnapshot, DateSpan, User};

#[derive(Clone)]
pub struct ActualsAggregator {
    db: Database,
}

impl ActualsAggregator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Snapshots for every given user, keyed by user id. Waits for all
    /// per-user aggregations to settle.
    pub async fn snapshots(
        &self,
        users: &[User],
        span: DateSpan,
    ) -> HashMap<String, ActualSnapshot> {
        let lookups = users
            .iter()
            .map(|user| async move { (user.id.clone(), self.snapshot_or_zero(user, span).await) });

        futures::future::join_all(lookups).await.into_iter().collect()
    }

    /// One user's snapshot, degrading to all-zero on failure.
    pub async fn snapshot_or_zero(&self, user: &User, span: DateSpan) -> ActualSnapshot {
        match self.snapshot(user, span).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(
                    user_id = %user.id,
                    user_name = %user.name,
                    error = %error,
                    "Actuals aggregation failed; reporting zeros for this user"
                );
                ActualSnapshot::default()
            }
        }
    }

    async fn snapshot(&self, user: &User, span: DateSpan) -> Result<ActualSnapshot> {
        let conn = self.db.connect()?;

        // Activity rows are keyed by display name; sales and contact
        // history by user id.
        let activity =
            ActivitiesRepository::counts_for_manager(&conn, &user.name, span).await?;
        let sales = SalesRepository::totals_for_user(&conn, &user.id, span).await?;
        let unique_customers =
            ContactHistoryRepository::unique_customers_for_user(&conn, &user.id, span).await?;

        Ok(ActualSnapshot {
            form: activity.form,
            dm: activity.dm,
            chat: activity.chat,
            phone: activity.phone,
            email: activity.email,
            retargeting_contacts: activity.retargeting_contacts,
            existing_contacts: activity.existing_contacts,
            unique_customers,
            new_sales: sales.new_sales,
            renewal_sales: sales.renewal_sales,
            termination_sales: sales.termination_sales,
            new_contracts: sales.new_contracts,
            renewal_contracts: sales.renewal_contracts,
            termination_contracts: sales.termination_contracts,
        })
    }
}

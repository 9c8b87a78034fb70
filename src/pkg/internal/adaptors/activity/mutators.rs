use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};

use crate::pkg::internal::adaptors::activity::spec::NewActivity;
use crate::prelude::Result;

/// Append-only; log rows are never updated or removed.
pub struct ActivityMutator<'a, DB: Database> {
    pool: &'a Pool<DB>,
}

impl<'a, DB> ActivityMutator<'a, DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    String: for<'q> Encode<'q, DB> + Type<DB>,
    Option<String>: for<'q> Encode<'q, DB> + Type<DB>,
    Option<i64>: for<'q> Encode<'q, DB> + Type<DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
{
    pub fn new(pool: &'a Pool<DB>) -> Self {
        ActivityMutator { pool }
    }

    pub async fn record(&self, activity: NewActivity) -> Result<i64> {
        let (id,) = sqlx::query_as::<DB, (i64,)>(
            r#"
            INSERT INTO activity_logs (admin_id, action, resource_type, resource_id, details, ip_address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(activity.admin_id)
        .bind(activity.action)
        .bind(activity.resource_type)
        .bind(activity.resource_id)
        .bind(serde_json::to_string(&activity.details)?)
        .bind(activity.ip_address)
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }
}

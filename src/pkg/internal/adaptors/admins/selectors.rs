use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};

use crate::{
    pkg::internal::adaptors::admins::spec::{ADMIN_COLUMNS, AdminEntry},
    prelude::Result,
};

pub struct AdminSelector<'a, DB: Database> {
    pool: &'a Pool<DB>,
}

impl<'a, DB> AdminSelector<'a, DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    String: for<'q> Encode<'q, DB> + Type<DB>,
    i64: for<'q> Encode<'q, DB> + Type<DB>,
    AdminEntry: for<'r> FromRow<'r, DB::Row>,
{
    pub fn new(pool: &'a Pool<DB>) -> Self {
        AdminSelector { pool }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<AdminEntry>> {
        let row = sqlx::query_as::<DB, AdminEntry>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE email = $1"
        ))
        .bind(email.trim().to_lowercase())
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<AdminEntry>> {
        let row = sqlx::query_as::<DB, AdminEntry>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }
}

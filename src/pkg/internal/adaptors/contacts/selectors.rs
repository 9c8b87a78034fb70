use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};

use crate::{
    pkg::internal::{
        adaptors::contacts::spec::{CONTACT_COLUMNS, ContactEntry, LISTING},
        listing::{Page, PageRequest, Predicate},
    },
    prelude::Result,
};

pub struct ContactSelector<'a, DB: Database> {
    pool: &'a Pool<DB>,
}

impl<'a, DB> ContactSelector<'a, DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    String: for<'q> Encode<'q, DB> + Type<DB>,
    i64: for<'q> Encode<'q, DB> + Type<DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
    ContactEntry: for<'r> FromRow<'r, DB::Row>,
{
    pub fn new(pool: &'a Pool<DB>) -> Self {
        ContactSelector { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<ContactEntry>> {
        let row = sqlx::query_as::<DB, ContactEntry>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(&self, predicate: &Predicate, request: PageRequest) -> Result<Page<ContactEntry>> {
        Ok(LISTING.fetch(self.pool, predicate, request).await?)
    }
}

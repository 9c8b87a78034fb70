use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};

use crate::{
    pkg::internal::{
        adaptors::activity::spec::{ActivityEntry, ActivityLog, LISTING},
        listing::{Page, PageRequest, Predicate},
    },
    prelude::Result,
};

pub struct ActivitySelector<'a, DB: Database> {
    pool: &'a Pool<DB>,
}

impl<'a, DB> ActivitySelector<'a, DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    String: for<'q> Encode<'q, DB> + Type<DB>,
    i64: for<'q> Encode<'q, DB> + Type<DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
    ActivityEntry: for<'r> FromRow<'r, DB::Row>,
{
    pub fn new(pool: &'a Pool<DB>) -> Self {
        ActivitySelector { pool }
    }

    pub async fn list(&self, predicate: &Predicate, request: PageRequest) -> Result<Page<ActivityLog>> {
        let page = LISTING
            .fetch::<DB, ActivityEntry>(self.pool, predicate, request)
            .await?;
        Ok(page.map(ActivityLog::from))
    }
}

use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};

use crate::{
    pkg::internal::{
        adaptors::newsletter::spec::{LISTING, SUBSCRIBER_COLUMNS, SubscriberEntry},
        listing::{Page, PageRequest, Predicate},
    },
    prelude::Result,
};

pub struct SubscriberSelector<'a, DB: Database> {
    pool: &'a Pool<DB>,
}

impl<'a, DB> SubscriberSelector<'a, DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    String: for<'q> Encode<'q, DB> + Type<DB>,
    i64: for<'q> Encode<'q, DB> + Type<DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
    SubscriberEntry: for<'r> FromRow<'r, DB::Row>,
{
    pub fn new(pool: &'a Pool<DB>) -> Self {
        SubscriberSelector { pool }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<SubscriberEntry>> {
        let row = sqlx::query_as::<DB, SubscriberEntry>(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM newsletter_subscribers WHERE email = $1"
        ))
        .bind(normalize(email))
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(
        &self,
        predicate: &Predicate,
        request: PageRequest,
    ) -> Result<Page<SubscriberEntry>> {
        Ok(LISTING.fetch(self.pool, predicate, request).await?)
    }
}

pub(crate) fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

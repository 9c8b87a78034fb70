use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};

use crate::{
    pkg::internal::{
        adaptors::jobs::spec::{
            ACTIVE_ONLY, ADMIN_LISTING, CAREERS_LISTING, JOB_COLUMNS, Job, JobEntry, JobWithCount,
        },
        listing::{Page, PageRequest, Predicate},
    },
    prelude::Result,
};

pub struct JobSelector<'a, DB: Database> {
    pool: &'a Pool<DB>,
}

impl<'a, DB> JobSelector<'a, DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    String: for<'q> Encode<'q, DB> + Type<DB>,
    i64: for<'q> Encode<'q, DB> + Type<DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
    JobEntry: for<'r> FromRow<'r, DB::Row>,
    JobWithCount: for<'r> FromRow<'r, DB::Row>,
{
    pub fn new(pool: &'a Pool<DB>) -> Self {
        JobSelector { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Job>> {
        let row = sqlx::query_as::<DB, JobEntry>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs j WHERE j.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(Job::from))
    }

    /// Only postings visible on the careers page.
    pub async fn get_active(&self, id: i64) -> Result<Option<Job>> {
        let row = sqlx::query_as::<DB, JobEntry>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs j WHERE j.id = $1 AND {ACTIVE_ONLY}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(Job::from))
    }

    pub async fn list(&self, predicate: &Predicate, request: PageRequest) -> Result<Page<Job>> {
        let page = ADMIN_LISTING
            .fetch::<DB, JobWithCount>(self.pool, predicate, request)
            .await?;
        Ok(page.map(Job::from))
    }

    pub async fn list_open(&self, predicate: Predicate, request: PageRequest) -> Result<Page<Job>> {
        let predicate = predicate.and(ACTIVE_ONLY);
        let page = CAREERS_LISTING
            .fetch::<DB, JobEntry>(self.pool, &predicate, request)
            .await?;
        Ok(page.map(Job::from))
    }
}

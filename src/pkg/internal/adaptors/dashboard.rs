use serde::Serialize;
use sqlx::{ColumnIndex, Database, Decode, Executor, IntoArguments, Pool, Type};

use crate::{
    pkg::internal::listing::{Counts, Tally},
    prelude::Result,
};

pub const CONTACTS: Tally = Tally {
    table: "contacts",
    buckets: &[
        ("new", "status = 'new'"),
        ("read", "status = 'read'"),
        ("replied", "status = 'replied'"),
        ("archived", "status = 'archived'"),
    ],
};

pub const APPLICATIONS: Tally = Tally {
    table: "applications",
    buckets: &[
        ("pending", "status = 'pending'"),
        ("reviewed", "status = 'reviewed'"),
        ("shortlisted", "status = 'shortlisted'"),
        ("rejected", "status = 'rejected'"),
        ("hired", "status = 'hired'"),
    ],
};

pub const JOBS: Tally = Tally {
    table: "jobs",
    buckets: &[
        ("draft", "status = 'draft'"),
        ("active", "status = 'active'"),
        ("closed", "status = 'closed'"),
    ],
};

pub const NEWSLETTER: Tally = Tally {
    table: "newsletter_subscribers",
    buckets: &[("active", "is_active = TRUE"), ("inactive", "is_active = FALSE")],
};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub contacts: Counts,
    pub applications: Counts,
    pub jobs: Counts,
    pub newsletter: Counts,
}

pub struct DashboardSelector<'a, DB: Database> {
    pool: &'a Pool<DB>,
}

impl<'a, DB> DashboardSelector<'a, DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    i64: for<'r> Decode<'r, DB> + Type<DB>,
    usize: ColumnIndex<DB::Row>,
{
    pub fn new(pool: &'a Pool<DB>) -> Self {
        DashboardSelector { pool }
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        Ok(DashboardStats {
            contacts: CONTACTS.run(self.pool).await?,
            applications: APPLICATIONS.run(self.pool).await?,
            jobs: JOBS.run(self.pool).await?,
            newsletter: NEWSLETTER.run(self.pool).await?,
        })
    }
}

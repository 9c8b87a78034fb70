use chrono::NaiveDate;
use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};

use crate::pkg::internal::adaptors::jobs::spec::{JOB_COLUMNS, Job, JobEntry, JobInput, join_requirements};
use crate::prelude::Result;

pub struct JobMutator<'a, DB: Database> {
    pool: &'a Pool<DB>,
}

impl<'a, DB> JobMutator<'a, DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    String: for<'q> Encode<'q, DB> + Type<DB>,
    Option<String>: for<'q> Encode<'q, DB> + Type<DB>,
    Option<NaiveDate>: for<'q> Encode<'q, DB> + Type<DB>,
    i64: for<'q> Encode<'q, DB> + Type<DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
    JobEntry: for<'r> FromRow<'r, DB::Row>,
{
    pub fn new(pool: &'a Pool<DB>) -> Self {
        JobMutator { pool }
    }

    pub async fn create(&self, job: &JobInput) -> Result<Job> {
        let row = sqlx::query_as::<DB, JobEntry>(&format!(
            r#"
            INSERT INTO jobs (title, description, requirements, location, job_type,
                              salary_range, category, status, application_deadline)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job.title.trim().to_string())
        .bind(job.description.clone())
        .bind(join_requirements(&job.requirements))
        .bind(job.location.clone())
        .bind(job.job_type.clone())
        .bind(job.salary_range.clone())
        .bind(job.category.clone())
        .bind(job.status.clone())
        .bind(job.application_deadline)
        .fetch_one(self.pool)
        .await?;
        tracing::info!("created job {} ({})", row.id, &row.title);
        Ok(row.into())
    }

    /// Replaces every editable field.
    pub async fn update(&self, id: i64, job: &JobInput) -> Result<Option<Job>> {
        let row = sqlx::query_as::<DB, JobEntry>(&format!(
            r#"
            UPDATE jobs SET title = $2, description = $3, requirements = $4, location = $5,
                job_type = $6, salary_range = $7, category = $8, status = $9,
                application_deadline = $10
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(job.title.trim().to_string())
        .bind(job.description.clone())
        .bind(join_requirements(&job.requirements))
        .bind(job.location.clone())
        .bind(job.job_type.clone())
        .bind(job.salary_range.clone())
        .bind(job.category.clone())
        .bind(job.status.clone())
        .bind(job.application_deadline)
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(Job::from))
    }

    /// Applications keep their rows; their `job_id` is cleared by the foreign key.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let deleted = sqlx::query_as::<DB, (i64,)>("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(deleted.is_some())
    }
}

use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};

use crate::pkg::internal::adaptors::applications::spec::{NewApplication, StoredFiles};
use crate::prelude::Result;

pub struct ApplicationMutator<'a, DB: Database> {
    pool: &'a Pool<DB>,
}

impl<'a, DB> ApplicationMutator<'a, DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    String: for<'q> Encode<'q, DB> + Type<DB>,
    Option<String>: for<'q> Encode<'q, DB> + Type<DB>,
    i64: for<'q> Encode<'q, DB> + Type<DB>,
    Option<i64>: for<'q> Encode<'q, DB> + Type<DB>,
    Option<f64>: for<'q> Encode<'q, DB> + Type<DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
    StoredFiles: for<'r> FromRow<'r, DB::Row>,
{
    pub fn new(pool: &'a Pool<DB>) -> Self {
        ApplicationMutator { pool }
    }

    pub async fn create(&self, application: &NewApplication) -> Result<i64> {
        let (id,) = sqlx::query_as::<DB, (i64,)>(
            r#"
            INSERT INTO applications (job_id, name, email, mobile, college, location,
                graduation_year, cgpa, gender, resume_path, cover_letter_path, skills,
                technologies, experience, cover_letter_text)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING id
            "#,
        )
        .bind(application.job_id)
        .bind(application.name.trim().to_string())
        .bind(application.email.trim().to_lowercase())
        .bind(application.mobile.clone())
        .bind(application.college.clone())
        .bind(application.location.clone())
        .bind(application.graduation_year)
        .bind(application.cgpa)
        .bind(application.gender.clone())
        .bind(application.resume_path.clone())
        .bind(application.cover_letter_path.clone())
        .bind(application.skills.clone())
        .bind(application.technologies.clone())
        .bind(application.experience.clone())
        .bind(application.cover_letter_text.clone())
        .fetch_one(self.pool)
        .await?;
        tracing::info!("received application {} for job {:?}", id, application.job_id);
        Ok(id)
    }

    /// Sets the status, and the notes too when given. Any status may follow any other.
    pub async fn update_status(
        &self,
        id: i64,
        status: &str,
        admin_notes: Option<String>,
    ) -> Result<bool> {
        let mut query = String::from("UPDATE applications SET status = $2");
        if admin_notes.is_some() {
            query.push_str(", admin_notes = $3");
        }
        query.push_str(" WHERE id = $1 RETURNING id");

        let mut q = sqlx::query_as::<DB, (i64,)>(&query)
            .bind(id)
            .bind(status.to_string());
        if let Some(notes) = admin_notes {
            q = q.bind(notes);
        }
        Ok(q.fetch_optional(self.pool).await?.is_some())
    }

    pub async fn update_notes(&self, id: i64, admin_notes: Option<String>) -> Result<bool> {
        let updated = sqlx::query_as::<DB, (i64,)>(
            "UPDATE applications SET admin_notes = $2 WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(admin_notes)
        .fetch_optional(self.pool)
        .await?;
        Ok(updated.is_some())
    }

    /// Returns the files the row pointed at so the caller can remove them.
    pub async fn delete(&self, id: i64) -> Result<Option<StoredFiles>> {
        let files = sqlx::query_as::<DB, StoredFiles>(
            "DELETE FROM applications WHERE id = $1 RETURNING resume_path, cover_letter_path",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(files)
    }
}

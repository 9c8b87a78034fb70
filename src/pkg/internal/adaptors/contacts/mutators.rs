use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};

use crate::pkg::internal::adaptors::contacts::spec::{CONTACT_COLUMNS, ContactEntry, ContactInput};
use crate::prelude::Result;

pub struct ContactMutator<'a, DB: Database> {
    pool: &'a Pool<DB>,
}

impl<'a, DB> ContactMutator<'a, DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    String: for<'q> Encode<'q, DB> + Type<DB>,
    Option<String>: for<'q> Encode<'q, DB> + Type<DB>,
    i64: for<'q> Encode<'q, DB> + Type<DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
    ContactEntry: for<'r> FromRow<'r, DB::Row>,
{
    pub fn new(pool: &'a Pool<DB>) -> Self {
        ContactMutator { pool }
    }

    pub async fn create(&self, contact: &ContactInput) -> Result<ContactEntry> {
        let row = sqlx::query_as::<DB, ContactEntry>(&format!(
            r#"
            INSERT INTO contacts (name, email, subject, phone, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(contact.name.trim().to_string())
        .bind(contact.email.trim().to_lowercase())
        .bind(contact.subject.clone())
        .bind(contact.phone.clone())
        .bind(contact.message.clone())
        .fetch_one(self.pool)
        .await?;
        tracing::info!("contact message {} from {}", row.id, &row.email);
        Ok(row)
    }

    /// First admin view of a `new` message moves it to `read`; other statuses are kept.
    pub async fn mark_read(&self, id: i64) -> Result<bool> {
        let updated = sqlx::query_as::<DB, (i64,)>(
            "UPDATE contacts SET status = 'read' WHERE id = $1 AND status = 'new' RETURNING id",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(updated.is_some())
    }

    pub async fn update_status(&self, id: i64, status: &str) -> Result<Option<ContactEntry>> {
        let row = sqlx::query_as::<DB, ContactEntry>(&format!(
            "UPDATE contacts SET status = $2 WHERE id = $1 RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .bind(status.to_string())
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let deleted = sqlx::query_as::<DB, (i64,)>("DELETE FROM contacts WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(deleted.is_some())
    }
}

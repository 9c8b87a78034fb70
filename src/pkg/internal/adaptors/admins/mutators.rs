use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};

use crate::pkg::internal::adaptors::admins::spec::{ADMIN_COLUMNS, AdminEntry};
use crate::prelude::Result;

pub struct AdminMutator<'a, DB: Database> {
    pool: &'a Pool<DB>,
}

impl<'a, DB> AdminMutator<'a, DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    String: for<'q> Encode<'q, DB> + Type<DB>,
    AdminEntry: for<'r> FromRow<'r, DB::Row>,
{
    pub fn new(pool: &'a Pool<DB>) -> Self {
        AdminMutator { pool }
    }

    /// Creates the admin, or resets name and password when the email exists.
    pub async fn upsert(&self, email: &str, name: &str, password_hash: &str) -> Result<AdminEntry> {
        let row = sqlx::query_as::<DB, AdminEntry>(&format!(
            r#"
            INSERT INTO admins (email, name, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET name = excluded.name, password_hash = excluded.password_hash
            RETURNING {ADMIN_COLUMNS}
            "#
        ))
        .bind(email.trim().to_lowercase())
        .bind(name.trim().to_string())
        .bind(password_hash.to_string())
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::{adaptors::admins::selectors::AdminSelector, testing::migrated_pool};

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_email() {
        let pool = migrated_pool().await;
        let mutator = AdminMutator::new(&pool);
        let first = mutator.upsert("Root@Example.com", "Root", "hash-1").await.unwrap();
        let second = mutator.upsert("root@example.com", "Superuser", "hash-2").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Superuser");

        let found = AdminSelector::new(&pool)
            .get_by_email("ROOT@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.password_hash, "hash-2");
        assert!(AdminSelector::new(&pool).get_by_id(found.id + 1).await.unwrap().is_none());
    }
}

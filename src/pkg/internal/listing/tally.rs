use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::{ColumnIndex, Database, Decode, Executor, IntoArguments, Pool, Row, Type};

use super::failure::{Failure, classify};

/// Row counts for one table, split by bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: i64,
    #[serde(flatten)]
    pub buckets: BTreeMap<&'static str, i64>,
}

/// Counts-by-condition over a table whose bucket column may not exist yet.
#[derive(Debug, Clone, Copy)]
pub struct Tally {
    pub table: &'static str,
    /// `(key, condition)` pairs, e.g. `("new", "status = 'new'")`.
    pub buckets: &'static [(&'static str, &'static str)],
}

impl Tally {
    pub fn full_query(&self) -> String {
        let mut sql = String::from("SELECT COUNT(*)");
        for (_, condition) in self.buckets {
            sql.push_str(&format!(
                ", COALESCE(SUM(CASE WHEN {condition} THEN 1 ELSE 0 END), 0)"
            ));
        }
        sql.push_str(&format!(" FROM {}", self.table));
        sql
    }

    pub fn reduced_query(&self) -> String {
        format!("SELECT COUNT(*) FROM {}", self.table)
    }

    pub fn zeroed(&self, total: i64) -> Counts {
        Counts {
            total,
            buckets: self.buckets.iter().map(|(key, _)| (*key, 0)).collect(),
        }
    }

    /// Full counts, or the bare total with zeroed buckets when the schema is
    /// behind. Connectivity and other failures are returned as errors.
    pub async fn run<DB>(&self, pool: &Pool<DB>) -> Result<Counts, sqlx::Error>
    where
        DB: Database,
        for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
        for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
        i64: for<'r> Decode<'r, DB> + Type<DB>,
        usize: ColumnIndex<DB::Row>,
    {
        let err = match self.full(pool).await {
            Ok(counts) => return Ok(counts),
            Err(err) => err,
        };
        if classify(&err) != Failure::SchemaDrift {
            return Err(err);
        }
        tracing::warn!(table = self.table, "counting totals only: {}", err);

        let sql = self.reduced_query();
        match sqlx::query::<DB>(&sql).fetch_one(pool).await {
            Ok(row) => Ok(self.zeroed(row.try_get::<i64, _>(0)?)),
            Err(err) if classify(&err) == Failure::Connectivity => Err(err),
            Err(err) => {
                tracing::warn!(table = self.table, "defaulting counts to zero: {}", err);
                Ok(self.zeroed(0))
            }
        }
    }

    async fn full<DB>(&self, pool: &Pool<DB>) -> Result<Counts, sqlx::Error>
    where
        DB: Database,
        for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
        for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
        i64: for<'r> Decode<'r, DB> + Type<DB>,
        usize: ColumnIndex<DB::Row>,
    {
        let sql = self.full_query();
        let row = sqlx::query::<DB>(&sql).fetch_one(pool).await?;
        let mut buckets = BTreeMap::new();
        for (i, (key, _)) in self.buckets.iter().enumerate() {
            buckets.insert(*key, row.try_get::<i64, _>(i + 1)?);
        }
        Ok(Counts {
            total: row.try_get::<i64, _>(0)?,
            buckets,
        })
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::pkg::internal::testing::{memory_pool, migrated_pool, minutes, seed_contact};

    const CONTACTS: Tally = Tally {
        table: "contacts",
        buckets: &[
            ("new", "status = 'new'"),
            ("read", "status = 'read'"),
            ("replied", "status = 'replied'"),
            ("archived", "status = 'archived'"),
        ],
    };

    fn counts(total: i64, buckets: &[(&'static str, i64)]) -> Counts {
        Counts {
            total,
            buckets: buckets.iter().copied().collect(),
        }
    }

    #[tokio::test]
    async fn test_full_counts() {
        let pool = migrated_pool().await;
        for (i, status) in ["new", "new", "read", "archived"].iter().enumerate() {
            seed_contact(&pool, &format!("Visitor{i}"), status, minutes(i as i64)).await;
        }
        let result = CONTACTS.run(&pool).await.unwrap();
        assert_eq!(
            result,
            counts(4, &[("new", 2), ("read", 1), ("replied", 0), ("archived", 1)])
        );
    }

    #[tokio::test]
    async fn test_empty_table_counts_zero() {
        let pool = migrated_pool().await;
        let result = CONTACTS.run(&pool).await.unwrap();
        assert_eq!(result, CONTACTS.zeroed(0));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_missing_status_column_keeps_total() {
        let pool = memory_pool().await;
        sqlx::raw_sql(
            "CREATE TABLE contacts (id INTEGER PRIMARY KEY, name TEXT);
             INSERT INTO contacts (name) VALUES ('a'), ('b'), ('c');",
        )
        .execute(&pool)
        .await
        .unwrap();
        let result = CONTACTS.run(&pool).await.unwrap();
        assert_eq!(result, CONTACTS.zeroed(3));
        assert!(logs_contain("counting totals only"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_missing_table_defaults_to_zero() {
        let pool = memory_pool().await;
        let result = CONTACTS.run(&pool).await.unwrap();
        assert_eq!(result, CONTACTS.zeroed(0));
        assert!(logs_contain("defaulting counts to zero"));
    }

    #[tokio::test]
    async fn test_connection_failure_propagates() {
        let pool = migrated_pool().await;
        pool.close().await;
        let err = CONTACTS.run(&pool).await.unwrap_err();
        assert_eq!(classify(&err), Failure::Connectivity);
    }

    #[test]
    fn test_serializes_flat() {
        let value = serde_json::to_value(counts(3, &[("active", 2), ("inactive", 1)])).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"total": 3, "active": 2, "inactive": 1})
        );
    }
}

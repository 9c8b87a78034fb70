use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};

use crate::{
    pkg::internal::{
        adaptors::applications::spec::{APPLICATION_SELECT, ApplicationEntry, LISTING},
        listing::{Page, PageRequest, Predicate},
    },
    prelude::Result,
};

pub struct ApplicationSelector<'a, DB: Database> {
    pool: &'a Pool<DB>,
}

impl<'a, DB> ApplicationSelector<'a, DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    String: for<'q> Encode<'q, DB> + Type<DB>,
    i64: for<'q> Encode<'q, DB> + Type<DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
    ApplicationEntry: for<'r> FromRow<'r, DB::Row>,
{
    pub fn new(pool: &'a Pool<DB>) -> Self {
        ApplicationSelector { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<ApplicationEntry>> {
        let row = sqlx::query_as::<DB, ApplicationEntry>(&format!("{APPLICATION_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list(
        &self,
        predicate: &Predicate,
        request: PageRequest,
    ) -> Result<Page<ApplicationEntry>> {
        Ok(LISTING.fetch(self.pool, predicate, request).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        pkg::internal::{
            adaptors::applications::spec::FILTERS,
            testing::{migrated_pool, minutes, seed_application, seed_job},
        },
        prelude::AppError,
    };

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_list_filters_by_job_and_status() {
        let pool = migrated_pool().await;
        let rust = seed_job(&pool, "Rust Developer", "active", minutes(0)).await;
        let go = seed_job(&pool, "Go Developer", "active", minutes(0)).await;
        seed_application(&pool, Some(rust), "Ada", "pending", minutes(1)).await;
        seed_application(&pool, Some(rust), "Grace", "shortlisted", minutes(2)).await;
        seed_application(&pool, Some(rust), "Barbara", "pending", minutes(3)).await;
        seed_application(&pool, Some(go), "Rob", "pending", minutes(4)).await;
        seed_application(&pool, None, "Walk In", "pending", minutes(5)).await;

        let job_id = rust.to_string();
        let predicate =
            Predicate::build(FILTERS, &params(&[("job_id", job_id.as_str()), ("status", "pending")]))
                .unwrap();
        let page = ApplicationSelector::new(&pool)
            .list(&predicate, PageRequest::default())
            .await
            .unwrap();
        let names: Vec<&str> = page.rows.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Barbara", "Ada"]);
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.rows[0].job_title.as_deref(), Some("Rust Developer"));
    }

    #[tokio::test]
    async fn test_unattached_application_has_no_job_title() {
        let pool = migrated_pool().await;
        let id = seed_application(&pool, None, "Walk In", "pending", minutes(5)).await;
        let entry = ApplicationSelector::new(&pool)
            .get_by_id(id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.job_id, None);
        assert_eq!(entry.job_title, None);
        assert!(ApplicationSelector::new(&pool).get_by_id(id + 1).await.unwrap().is_none());
    }

    #[test]
    fn test_non_numeric_job_filter_is_rejected() {
        let err = Predicate::build(FILTERS, &params(&[("job_id", "seven")])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

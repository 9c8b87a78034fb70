use std::collections::HashMap;

use serde::Serialize;
use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};

use super::predicate::Predicate;

/// Marks where a listing template takes its WHERE clause.
pub const CONDITIONS: &str = "{conditions}";
pub const DEFAULT_LIMIT: i64 = 20;

/// Sanitized 1-based page and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Anything that is not a plain integer falls back to the default; the
    /// result is interpolated into SQL so raw text never survives this step.
    pub fn new(page: Option<&str>, limit: Option<&str>) -> Self {
        PageRequest {
            page: page.and_then(coerce).unwrap_or(1).max(1),
            limit: limit.and_then(coerce).unwrap_or(DEFAULT_LIMIT).max(1),
        }
    }

    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self::new(
            params.get("page").map(String::as_str),
            params.get("limit").map(String::as_str),
        )
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn coerce(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if total <= 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Pagination {
            page,
            limit,
            total,
            pages,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Per-row post-processing; row count and order are preserved.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// A row query and its count query sharing one `{conditions}` placement.
///
/// Templates must not carry their own WHERE; fixed conditions go through
/// [`Predicate::and`]. Grouped listings place `{conditions}` before
/// GROUP BY and count distinct base ids.
#[derive(Debug, Clone, Copy)]
pub struct Listing {
    pub select: &'static str,
    pub count: &'static str,
    pub order_by: &'static str,
    pub max_limit: i64,
}

impl Listing {
    fn splice(template: &str, where_clause: &str) -> String {
        debug_assert_eq!(
            template.matches(CONDITIONS).count(),
            1,
            "listing template needs exactly one {CONDITIONS}: {template}"
        );
        match template.split_once(CONDITIONS) {
            Some((head, tail)) => format!("{head}{where_clause}{tail}"),
            None => format!("{template}{where_clause}"),
        }
    }

    pub fn row_sql(&self, predicate: &Predicate, request: PageRequest) -> String {
        format!(
            "{} ORDER BY {} LIMIT {} OFFSET {}",
            Self::splice(self.select, &predicate.render(1)),
            self.order_by,
            request.limit,
            request.offset()
        )
    }

    pub fn count_sql(&self, predicate: &Predicate) -> String {
        Self::splice(self.count, &predicate.render(1))
    }

    /// Runs the page and count queries with the same predicate.
    pub async fn fetch<DB, T>(
        &self,
        pool: &Pool<DB>,
        predicate: &Predicate,
        request: PageRequest,
    ) -> Result<Page<T>, sqlx::Error>
    where
        DB: Database,
        for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
        for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
        String: for<'e> Encode<'e, DB> + Type<DB>,
        i64: for<'e> Encode<'e, DB> + Type<DB>,
        (i64,): for<'r> FromRow<'r, DB::Row>,
        T: for<'r> FromRow<'r, DB::Row> + Send + Unpin,
    {
        let request = PageRequest {
            page: request.page.max(1),
            limit: request.limit.clamp(1, self.max_limit),
        };
        let count_sql = self.count_sql(predicate);
        let row_sql = self.row_sql(predicate, request);
        tracing::debug!(sql = %row_sql, binds = predicate.binds().len(), "listing");

        let (total,): (i64,) = predicate
            .bind(sqlx::query_as::<DB, (i64,)>(&count_sql))
            .fetch_one(pool)
            .await?;
        let rows: Vec<T> = predicate
            .bind(sqlx::query_as::<DB, T>(&row_sql))
            .fetch_all(pool)
            .await?;

        Ok(Page {
            rows,
            pagination: Pagination::new(request.page, request.limit, total),
        })
    }
}

use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};

use crate::pkg::internal::adaptors::newsletter::{
    selectors::{SubscriberSelector, normalize},
    spec::{SubscriberEntry, Subscription},
};
use crate::pkg::internal::listing::{Failure, classify};
use crate::prelude::{AppError, Result};

pub struct SubscriberMutator<'a, DB: Database> {
    pool: &'a Pool<DB>,
}

impl<'a, DB> SubscriberMutator<'a, DB>
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
        SubscriberMutator { pool }
    }

    /// Adds the address, or reactivates it if it unsubscribed earlier.
    ///
    /// The lookup and the write are not atomic; a concurrent duplicate that
    /// slips past the lookup is rejected by the unique index and reported as
    /// [`AppError::AlreadySubscribed`], same as the sequential case.
    pub async fn subscribe(&self, email: &str) -> Result<Subscription> {
        let email = normalize(email);
        match SubscriberSelector::new(self.pool).get_by_email(&email).await? {
            Some(existing) if existing.is_active => Err(AppError::AlreadySubscribed),
            Some(existing) => {
                let reactivated = sqlx::query_as::<DB, (i64,)>(
                    r#"
                    UPDATE newsletter_subscribers
                    SET is_active = TRUE, subscribed_at = CURRENT_TIMESTAMP, unsubscribed_at = NULL
                    WHERE id = $1 AND is_active = FALSE
                    RETURNING id
                    "#,
                )
                .bind(existing.id)
                .fetch_optional(self.pool)
                .await?;
                match reactivated {
                    Some(_) => {
                        tracing::info!("reactivated newsletter subscriber {}", existing.id);
                        Ok(Subscription::Reactivated)
                    }
                    None => Err(AppError::AlreadySubscribed),
                }
            }
            None => {
                let inserted = sqlx::query_as::<DB, (i64,)>(
                    "INSERT INTO newsletter_subscribers (email) VALUES ($1) RETURNING id",
                )
                .bind(email)
                .fetch_one(self.pool)
                .await;
                match inserted {
                    Ok((id,)) => {
                        tracing::info!("new newsletter subscriber {}", id);
                        Ok(Subscription::Created)
                    }
                    Err(err) if classify(&err) == Failure::UniqueViolation => {
                        tracing::debug!("duplicate subscription raced: {}", err);
                        Err(AppError::AlreadySubscribed)
                    }
                    Err(err) => Err(err.into()),
                }
            }
        }
    }

    /// False when the address is unknown or already inactive.
    pub async fn unsubscribe(&self, email: &str) -> Result<bool> {
        let updated = sqlx::query_as::<DB, (i64,)>(
            r#"
            UPDATE newsletter_subscribers
            SET is_active = FALSE, unsubscribed_at = CURRENT_TIMESTAMP
            WHERE email = $1 AND is_active = TRUE
            RETURNING id
            "#,
        )
        .bind(normalize(email))
        .fetch_optional(self.pool)
        .await?;
        Ok(updated.is_some())
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let deleted = sqlx::query_as::<DB, (i64,)>(
            "DELETE FROM newsletter_subscribers WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(deleted.is_some())
    }
}

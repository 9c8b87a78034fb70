use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::pkg::internal::listing::{Filter, Listing, Match};

pub(crate) const SUBSCRIBER_COLUMNS: &str = "id, email, is_active, subscribed_at, unsubscribed_at";

pub const LISTING: Listing = Listing {
    select: "SELECT id, email, is_active, subscribed_at, unsubscribed_at FROM newsletter_subscribers {conditions}",
    count: "SELECT COUNT(*) FROM newsletter_subscribers {conditions}",
    order_by: "subscribed_at DESC, id DESC",
    max_limit: 100,
};

pub const FILTERS: &[Filter] = &[
    Filter::new(
        "status",
        Match::Flag(&[("active", "is_active = TRUE"), ("inactive", "is_active = FALSE")]),
    ),
    Filter::new("search", Match::Search(&["email"])),
];

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SubscriberEntry {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    Created,
    Reactivated,
}

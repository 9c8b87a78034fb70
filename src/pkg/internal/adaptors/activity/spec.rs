use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use crate::pkg::internal::listing::{Filter, Listing, Match};

pub const ACTIONS: &[&str] = &["create", "update", "delete"];

pub const LISTING: Listing = Listing {
    select: "SELECT l.id, l.admin_id, ad.email AS admin_email, l.action, l.resource_type, \
             l.resource_id, l.details, l.ip_address, l.created_at \
             FROM activity_logs l LEFT JOIN admins ad ON ad.id = l.admin_id {conditions}",
    count: "SELECT COUNT(*) FROM activity_logs l {conditions}",
    order_by: "l.created_at DESC, l.id DESC",
    max_limit: 100,
};

pub const FILTERS: &[Filter] = &[
    Filter::new("action", Match::OneOf("l.action", ACTIONS)),
    Filter::new("resource_type", Match::Exact("l.resource_type")),
    Filter::new("admin_id", Match::Id("l.admin_id")),
    Filter::new(
        "search",
        Match::Search(&["l.action", "l.resource_type", "l.details"]),
    ),
];

#[derive(Debug, Clone, FromRow)]
pub struct ActivityEntry {
    pub id: i64,
    pub admin_id: Option<i64>,
    pub admin_email: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<i64>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityLog {
    pub id: i64,
    pub admin_id: Option<i64>,
    pub admin_email: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<i64>,
    pub details: Value,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityEntry> for ActivityLog {
    fn from(entry: ActivityEntry) -> Self {
        let details = entry
            .details
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or(Value::Null);
        ActivityLog {
            id: entry.id,
            admin_id: entry.admin_id,
            admin_email: entry.admin_email,
            action: entry.action,
            resource_type: entry.resource_type,
            resource_id: entry.resource_id,
            details,
            ip_address: entry.ip_address,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub admin_id: Option<i64>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<i64>,
    pub details: Value,
    pub ip_address: Option<String>,
}

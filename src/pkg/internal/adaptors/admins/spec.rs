use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub(crate) const ADMIN_COLUMNS: &str = "id, email, name, password_hash, created_at";

#[derive(Debug, Clone, FromRow)]
pub struct AdminEntry {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// What the console sees of an admin; never carries the hash.
#[derive(Debug, Clone, Serialize)]
pub struct AdminProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<&AdminEntry> for AdminProfile {
    fn from(entry: &AdminEntry) -> Self {
        AdminProfile {
            id: entry.id,
            email: entry.email.clone(),
            name: entry.name.clone(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::pkg::internal::listing::{Filter, Listing, Match};

pub const CONTACT_STATUSES: &[&str] = &["new", "read", "replied", "archived"];

pub(crate) const CONTACT_COLUMNS: &str = "id, name, email, subject, phone, message, status, created_at";

pub const LISTING: Listing = Listing {
    select: "SELECT id, name, email, subject, phone, message, status, created_at FROM contacts {conditions}",
    count: "SELECT COUNT(*) FROM contacts {conditions}",
    order_by: "created_at DESC, id DESC",
    max_limit: 100,
};

pub const FILTERS: &[Filter] = &[
    Filter::new("status", Match::OneOf("status", CONTACT_STATUSES)),
    Filter::new(
        "search",
        Match::Search(&["name", "email", "subject", "message"]),
    ),
];

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContactEntry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Public contact form body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactInput {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(max = 300, message = "Subject is too long"))]
    pub subject: Option<String>,
    #[validate(length(max = 20, message = "Phone number is too long"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_contact_input_validation() {
        let input: ContactInput = serde_json::from_value(json!({
            "name": "Grace",
            "email": "grace@example.com",
            "message": "Hello",
        }))
        .unwrap();
        assert!(input.validate().is_ok());
        assert!(input.subject.is_none());

        let input: ContactInput = serde_json::from_value(json!({
            "name": "Grace",
            "email": "not-an-email",
            "message": "",
        }))
        .unwrap();
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("message"));
        assert!(!fields.contains_key("name"));
    }
}

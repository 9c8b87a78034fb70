use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::pkg::internal::listing::{Filter, Listing, Match};

pub const JOB_STATUSES: &[&str] = &["draft", "active", "closed"];
pub const JOB_TYPES: &[&str] = &["full_time", "part_time", "contract", "internship"];

pub(crate) const JOB_COLUMNS: &str = "id, title, description, requirements, location, job_type, \
     salary_range, category, status, application_deadline, created_at";

pub const ADMIN_LISTING: Listing = Listing {
    select: "SELECT j.id, j.title, j.description, j.requirements, j.location, j.job_type, \
             j.salary_range, j.category, j.status, j.application_deadline, j.created_at, \
             COUNT(a.id) AS application_count \
             FROM jobs j LEFT JOIN applications a ON a.job_id = j.id {conditions} GROUP BY j.id",
    count: "SELECT COUNT(DISTINCT j.id) FROM jobs j \
            LEFT JOIN applications a ON a.job_id = j.id {conditions}",
    order_by: "j.created_at DESC, j.id DESC",
    max_limit: 100,
};

pub const ADMIN_FILTERS: &[Filter] = &[
    Filter::new("status", Match::OneOf("j.status", JOB_STATUSES)),
    Filter::new("job_type", Match::OneOf("j.job_type", JOB_TYPES)),
    Filter::new("category", Match::Exact("j.category")),
    Filter::new(
        "search",
        Match::Search(&["j.title", "j.description", "j.location", "j.category"]),
    ),
];

/// Public careers page; callers add the `active` condition.
pub const CAREERS_LISTING: Listing = Listing {
    select: "SELECT j.id, j.title, j.description, j.requirements, j.location, j.job_type, \
             j.salary_range, j.category, j.status, j.application_deadline, j.created_at \
             FROM jobs j {conditions}",
    count: "SELECT COUNT(*) FROM jobs j {conditions}",
    order_by: "j.created_at DESC, j.id DESC",
    max_limit: 50,
};

pub const CAREERS_FILTERS: &[Filter] = &[
    Filter::new("job_type", Match::OneOf("j.job_type", JOB_TYPES)),
    Filter::new("category", Match::Exact("j.category")),
    Filter::new(
        "search",
        Match::Search(&["j.title", "j.description", "j.location", "j.category"]),
    ),
];

pub const ACTIVE_ONLY: &str = "j.status = 'active'";

#[derive(Debug, Clone, FromRow)]
pub struct JobEntry {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: Option<String>,
    pub job_type: String,
    pub salary_range: Option<String>,
    pub category: Option<String>,
    pub status: String,
    pub application_deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct JobWithCount {
    #[sqlx(flatten)]
    pub job: JobEntry,
    pub application_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub location: Option<String>,
    pub job_type: String,
    pub salary_range: Option<String>,
    pub category: Option<String>,
    pub status: String,
    pub application_deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_count: Option<i64>,
}

impl From<JobEntry> for Job {
    fn from(entry: JobEntry) -> Self {
        Job {
            id: entry.id,
            title: entry.title,
            description: entry.description,
            requirements: split_requirements(&entry.requirements),
            location: entry.location,
            job_type: entry.job_type,
            salary_range: entry.salary_range,
            category: entry.category,
            status: entry.status,
            application_deadline: entry.application_deadline,
            created_at: entry.created_at,
            application_count: None,
        }
    }
}

impl From<JobWithCount> for Job {
    fn from(row: JobWithCount) -> Self {
        Job {
            application_count: Some(row.application_count),
            ..row.job.into()
        }
    }
}

/// Requirements are stored one per line.
pub fn split_requirements(blob: &str) -> Vec<String> {
    blob.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn join_requirements(items: &[String]) -> String {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Body of an admin create or full update.
#[derive(Debug, Deserialize, Validate)]
pub struct JobInput {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub location: Option<String>,
    #[serde(default = "default_job_type")]
    #[validate(custom(function = "known_job_type"))]
    pub job_type: String,
    pub salary_range: Option<String>,
    pub category: Option<String>,
    #[serde(default = "default_status")]
    #[validate(custom(function = "known_job_status"))]
    pub status: String,
    pub application_deadline: Option<NaiveDate>,
}

fn default_job_type() -> String {
    "full_time".to_string()
}

fn default_status() -> String {
    "draft".to_string()
}

fn known_job_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, JOB_TYPES)
}

fn known_job_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, JOB_STATUSES)
}

fn one_of(value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("one_of").with_message(Cow::Owned(format!(
            "must be one of: {}",
            allowed.join(", ")
        ))))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::prelude::AppError;

    #[test]
    fn test_input_defaults_and_membership() {
        let input: JobInput = serde_json::from_value(json!({
            "title": "Engineer",
            "description": "Build things",
        }))
        .unwrap();
        assert_eq!(input.status, "draft");
        assert_eq!(input.job_type, "full_time");
        assert!(input.requirements.is_empty());
        assert!(input.validate().is_ok());

        let input: JobInput = serde_json::from_value(json!({
            "title": "",
            "description": "Build things",
            "job_type": "gig",
            "status": "published",
        }))
        .unwrap();
        let err: AppError = input.validate().unwrap_err().into();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["job_type", "status", "title"]);
        assert_eq!(fields[0].message, "must be one of: full_time, part_time, contract, internship");
    }

    #[test]
    fn test_requirements_round_trip_drops_blanks() {
        let items = vec![" Rust ".to_string(), "".to_string(), "SQL".to_string()];
        let blob = join_requirements(&items);
        assert_eq!(blob, "Rust\nSQL");
        assert_eq!(split_requirements("Rust\r\n\n  SQL \n"), vec!["Rust", "SQL"]);
    }
}

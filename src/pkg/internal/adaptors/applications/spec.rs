use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use validator::Validate;

use crate::pkg::internal::listing::{Filter, Listing, Match};

pub const APPLICATION_STATUSES: &[&str] = &["pending", "reviewed", "shortlisted", "rejected", "hired"];

pub(crate) const APPLICATION_SELECT: &str = "SELECT a.id, a.job_id, j.title AS job_title, a.name, a.email, \
     a.mobile, a.college, a.location, a.graduation_year, a.cgpa, a.gender, a.resume_path, \
     a.cover_letter_path, a.skills, a.technologies, a.experience, a.cover_letter_text, a.status, \
     a.admin_notes, a.created_at \
     FROM applications a LEFT JOIN jobs j ON j.id = a.job_id";

pub const LISTING: Listing = Listing {
    select: "SELECT a.id, a.job_id, j.title AS job_title, a.name, a.email, a.mobile, a.college, \
             a.location, a.graduation_year, a.cgpa, a.gender, a.resume_path, a.cover_letter_path, \
             a.skills, a.technologies, a.experience, a.cover_letter_text, a.status, a.admin_notes, \
             a.created_at \
             FROM applications a LEFT JOIN jobs j ON j.id = a.job_id {conditions}",
    count: "SELECT COUNT(*) FROM applications a LEFT JOIN jobs j ON j.id = a.job_id {conditions}",
    order_by: "a.created_at DESC, a.id DESC",
    max_limit: 100,
};

pub const FILTERS: &[Filter] = &[
    Filter::new("status", Match::OneOf("a.status", APPLICATION_STATUSES)),
    Filter::new("job_id", Match::Id("a.job_id")),
    Filter::new(
        "search",
        Match::Search(&["a.name", "a.email", "a.college", "a.skills"]),
    ),
];

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationEntry {
    pub id: i64,
    pub job_id: Option<i64>,
    pub job_title: Option<String>,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub college: Option<String>,
    pub location: Option<String>,
    pub graduation_year: Option<i64>,
    pub cgpa: Option<f64>,
    pub gender: Option<String>,
    pub resume_path: Option<String>,
    pub cover_letter_path: Option<String>,
    pub skills: Option<String>,
    pub technologies: Option<String>,
    pub experience: Option<String>,
    pub cover_letter_text: Option<String>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Files referenced by a deleted application.
#[derive(Debug, Clone, FromRow)]
pub struct StoredFiles {
    pub resume_path: Option<String>,
    pub cover_letter_path: Option<String>,
}

impl StoredFiles {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        [&self.resume_path, &self.cover_letter_path]
            .into_iter()
            .filter_map(|path| path.as_deref())
    }
}

/// A public submission, before its files are written.
#[derive(Debug, Clone, Default, Validate)]
pub struct NewApplication {
    pub job_id: Option<i64>,
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(max = 20, message = "Mobile number is too long"))]
    pub mobile: Option<String>,
    pub college: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = 1950, max = 2100, message = "Graduation year is out of range"))]
    pub graduation_year: Option<i64>,
    #[validate(range(min = 0.0, max = 10.0, message = "CGPA must be between 0 and 10"))]
    pub cgpa: Option<f64>,
    pub gender: Option<String>,
    pub skills: Option<String>,
    pub technologies: Option<String>,
    pub experience: Option<String>,
    pub cover_letter_text: Option<String>,
    pub resume_path: Option<String>,
    pub cover_letter_path: Option<String>,
}

//! In-memory SQLite stand-ins for the Postgres pool, shared by unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

pub const SCHEMA: &str = r#"
CREATE TABLE admins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    requirements TEXT NOT NULL DEFAULT '',
    location TEXT,
    job_type TEXT NOT NULL DEFAULT 'full_time',
    salary_range TEXT,
    category TEXT,
    status TEXT NOT NULL DEFAULT 'draft',
    application_deadline DATE,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id BIGINT REFERENCES jobs (id) ON DELETE SET NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    mobile TEXT,
    college TEXT,
    location TEXT,
    graduation_year BIGINT,
    cgpa REAL,
    gender TEXT,
    resume_path TEXT,
    cover_letter_path TEXT,
    skills TEXT,
    technologies TEXT,
    experience TEXT,
    cover_letter_text TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    admin_notes TEXT,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    subject TEXT,
    phone TEXT,
    message TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'new',
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE newsletter_subscribers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    subscribed_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    unsubscribed_at DATETIME
);
CREATE TABLE activity_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    admin_id BIGINT,
    action TEXT NOT NULL,
    resource_type TEXT NOT NULL,
    resource_id BIGINT,
    details TEXT,
    ip_address TEXT,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

/// A single-connection pool so every query sees the same in-memory database.
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("sqlite memory pool")
}

pub async fn migrated_pool() -> SqlitePool {
    let pool = memory_pool().await;
    sqlx::raw_sql(SCHEMA)
        .execute(&pool)
        .await
        .expect("apply test schema");
    pool
}

/// Deterministic creation time: `n` minutes after a fixed epoch.
pub fn minutes(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(n)
}

pub async fn seed_job(pool: &SqlitePool, title: &str, status: &str, created_at: DateTime<Utc>) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO jobs (title, description, requirements, location, job_type, category, status, created_at)
         VALUES ($1, $2, $3, 'Remote', 'full_time', 'engineering', $4, $5) RETURNING id",
    )
    .bind(title)
    .bind(format!("{title} description"))
    .bind("Rust\nSQL")
    .bind(status)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .expect("seed job")
}

pub async fn seed_application(
    pool: &SqlitePool,
    job_id: Option<i64>,
    name: &str,
    status: &str,
    created_at: DateTime<Utc>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO applications (job_id, name, email, college, skills, status, created_at)
         VALUES ($1, $2, $3, 'State College', 'rust', $4, $5) RETURNING id",
    )
    .bind(job_id)
    .bind(name)
    .bind(format!("{}@example.com", name.to_lowercase().replace(' ', ".")))
    .bind(status)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .expect("seed application")
}

pub async fn seed_contact(pool: &SqlitePool, name: &str, status: &str, created_at: DateTime<Utc>) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO contacts (name, email, subject, message, status, created_at)
         VALUES ($1, $2, 'Hello', 'Interested in your services', $3, $4) RETURNING id",
    )
    .bind(name)
    .bind(format!("{}@example.com", name.to_lowercase()))
    .bind(status)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .expect("seed contact")
}

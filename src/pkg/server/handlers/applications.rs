use std::{collections::HashMap, str::FromStr};

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::{Database, Encode, Executor, FromRow, IntoArguments, Pool, Type};
use validator::Validate;

use super::{paginated, require_status};
use crate::{
    pkg::{
        internal::{
            adaptors::{
                applications::{
                    mutators::ApplicationMutator,
                    selectors::ApplicationSelector,
                    spec::{
                        APPLICATION_STATUSES, ApplicationEntry, FILTERS, NewApplication, StoredFiles,
                    },
                },
                jobs::{
                    selectors::JobSelector,
                    spec::{JobEntry, JobWithCount},
                },
            },
            listing::{PageRequest, Predicate},
            uploads::{Folder, Uploads, content_type},
        },
        server::state::AppState,
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: String,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NotesUpdate {
    pub admin_notes: Option<String>,
}

/// A file field from the form, not yet written.
pub struct Upload {
    folder: Folder,
    field: &'static str,
    file_name: String,
    data: Bytes,
}

/// Text fields of the form; blanks count as missing.
struct Fields(HashMap<String, String>);

impl Fields {
    fn text(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn number<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.text(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| AppError::invalid(key, &format!("{} must be a number", key))),
        }
    }

    fn application(&self) -> Result<NewApplication> {
        Ok(NewApplication {
            job_id: self.number("job_id")?,
            name: self.text("name").unwrap_or_default(),
            email: self.text("email").unwrap_or_default(),
            mobile: self.text("mobile"),
            college: self.text("college"),
            location: self.text("location"),
            graduation_year: self.number("graduation_year")?,
            cgpa: self.number("cgpa")?,
            gender: self.text("gender"),
            skills: self.text("skills"),
            technologies: self.text("technologies"),
            experience: self.text("experience"),
            cover_letter_text: self.text("cover_letter_text"),
            resume_path: None,
            cover_letter_path: None,
        })
    }
}

/// Public submission: form fields plus a resume and an optional cover letter.
pub async fn submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>)> {
    let mut fields = HashMap::new();
    let mut files: Vec<Upload> = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        let (folder, field_name) = match name.as_str() {
            "resume" => (Folder::Resumes, "resume"),
            "cover_letter" => (Folder::CoverLetters, "cover_letter"),
            _ => {
                let value = field.text().await?;
                fields.insert(name, value);
                continue;
            }
        };
        let file_name = field.file_name().unwrap_or("").to_string();
        let data = field.bytes().await?;
        if file_name.is_empty() && data.is_empty() {
            continue;
        }
        files.push(Upload {
            folder,
            field: field_name,
            file_name,
            data,
        });
    }

    let application = Fields(fields).application()?;
    let id = receive(&*state.db_pool, &state.uploads, application, &files).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Application submitted successfully",
            "application_id": id,
        })),
    ))
}

/// Validates, stores the files and records the application. Nothing is
/// written until every check has passed, and files already written are
/// removed again if a later step fails.
pub async fn receive<DB>(
    pool: &Pool<DB>,
    uploads: &Uploads,
    mut application: NewApplication,
    files: &[Upload],
) -> Result<i64>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    String: for<'q> Encode<'q, DB> + Type<DB>,
    Option<String>: for<'q> Encode<'q, DB> + Type<DB>,
    i64: for<'q> Encode<'q, DB> + Type<DB>,
    Option<i64>: for<'q> Encode<'q, DB> + Type<DB>,
    Option<f64>: for<'q> Encode<'q, DB> + Type<DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
    StoredFiles: for<'r> FromRow<'r, DB::Row>,
    JobEntry: for<'r> FromRow<'r, DB::Row>,
    JobWithCount: for<'r> FromRow<'r, DB::Row>,
{
    application.validate()?;
    if !files.iter().any(|f| f.folder == Folder::Resumes) {
        return Err(AppError::invalid("resume", "Resume is required"));
    }
    let mut extensions = Vec::with_capacity(files.len());
    for file in files {
        extensions.push(uploads.check(file.field, &file.file_name, &file.data)?);
    }
    if let Some(job_id) = application.job_id {
        if JobSelector::new(pool).get_active(job_id).await?.is_none() {
            return Err(AppError::invalid("job_id", "Job is not open for applications"));
        }
    }

    let mut written = Vec::new();
    for (file, extension) in files.iter().zip(&extensions) {
        let stored = match uploads.save(file.folder, extension, &file.data).await {
            Ok(stored) => stored,
            Err(e) => {
                discard(uploads, &written).await;
                return Err(e);
            }
        };
        match file.folder {
            Folder::Resumes => application.resume_path = Some(stored.clone()),
            Folder::CoverLetters => application.cover_letter_path = Some(stored.clone()),
        }
        written.push(stored);
    }

    match ApplicationMutator::new(pool).create(&application).await {
        Ok(id) => Ok(id),
        Err(e) => {
            discard(uploads, &written).await;
            Err(e)
        }
    }
}

async fn discard(uploads: &Uploads, stored: &[String]) {
    for path in stored {
        uploads.remove(path).await;
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let predicate = Predicate::build(FILTERS, &params)?;
    let page = ApplicationSelector::new(&*state.db_pool)
        .list(&predicate, PageRequest::from_params(&params))
        .await?;
    paginated("applications", page)
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let application = ApplicationSelector::new(&*state.db_pool)
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Application"))?;
    Ok(Json(json!({"success": true, "application": application})))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<StatusUpdate>,
) -> Result<Json<Value>> {
    require_status(&input.status, APPLICATION_STATUSES)?;
    if !ApplicationMutator::new(&*state.db_pool)
        .update_status(id, &input.status, input.admin_notes)
        .await?
    {
        return Err(AppError::NotFound("Application"));
    }
    Ok(Json(json!({"success": true, "message": "Status updated"})))
}

pub async fn update_notes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<NotesUpdate>,
) -> Result<Json<Value>> {
    if !ApplicationMutator::new(&*state.db_pool)
        .update_notes(id, input.admin_notes)
        .await?
    {
        return Err(AppError::NotFound("Application"));
    }
    Ok(Json(json!({"success": true, "message": "Notes updated"})))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let files = ApplicationMutator::new(&*state.db_pool)
        .delete(id)
        .await?
        .ok_or(AppError::NotFound("Application"))?;
    for path in files.paths() {
        state.uploads.remove(path).await;
    }
    Ok(Json(json!({"success": true, "message": "Application deleted"})))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Resume,
    CoverLetter,
}

/// Stored path and contents of one of an application's documents.
pub async fn fetch_document<DB>(
    pool: &Pool<DB>,
    uploads: &Uploads,
    id: i64,
    document: Document,
) -> Result<(String, Vec<u8>)>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    for<'q> DB::Arguments<'q>: IntoArguments<'q, DB>,
    String: for<'q> Encode<'q, DB> + Type<DB>,
    i64: for<'q> Encode<'q, DB> + Type<DB>,
    (i64,): for<'r> FromRow<'r, DB::Row>,
    ApplicationEntry: for<'r> FromRow<'r, DB::Row>,
{
    let application = ApplicationSelector::new(pool)
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Application"))?;
    let stored = match document {
        Document::Resume => application.resume_path,
        Document::CoverLetter => application.cover_letter_path,
    }
    .ok_or(AppError::NotFound("File"))?;
    let data = uploads.read(&stored).await?;
    Ok((stored, data))
}

fn document_response(stored: &str, data: Vec<u8>, disposition: &str) -> Response {
    let file_name = stored.rsplit('/').next().unwrap_or(stored);
    (
        [
            (CONTENT_TYPE, content_type(stored).to_string()),
            (
                CONTENT_DISPOSITION,
                format!("{}; filename=\"{}\"", disposition, file_name),
            ),
        ],
        data,
    )
        .into_response()
}

async fn download(
    state: &AppState,
    id: i64,
    document: Document,
    disposition: &str,
) -> Result<Response> {
    let (stored, data) = fetch_document(&*state.db_pool, &state.uploads, id, document).await?;
    Ok(document_response(&stored, data, disposition))
}

pub async fn resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    download(&state, id, Document::Resume, "attachment").await
}

pub async fn resume_preview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    download(&state, id, Document::Resume, "inline").await
}

pub async fn cover_letter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    download(&state, id, Document::CoverLetter, "attachment").await
}

#[cfg(test)]
mod tests {
    use std::path::Path as FsPath;

    use tracing_test::traced_test;

    use super::*;
    use crate::pkg::internal::testing::{migrated_pool, minutes, seed_job};

    fn applicant(job_id: Option<i64>) -> NewApplication {
        NewApplication {
            job_id,
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            ..Default::default()
        }
    }

    fn resume() -> Upload {
        Upload {
            folder: Folder::Resumes,
            field: "resume",
            file_name: "cv.pdf".into(),
            data: Bytes::from_static(b"%PDF-1.4 resume"),
        }
    }

    fn cover_letter() -> Upload {
        Upload {
            folder: Folder::CoverLetters,
            field: "cover_letter",
            file_name: "letter.docx".into(),
            data: Bytes::from_static(b"letter"),
        }
    }

    /// Files left under the upload root, across both folders.
    fn stored_files(root: &FsPath) -> usize {
        ["resumes", "cover_letters"]
            .iter()
            .filter_map(|dir| std::fs::read_dir(root.join(dir)).ok())
            .map(|entries| entries.count())
            .sum()
    }

    #[tokio::test]
    async fn test_receive_stores_files_and_row() {
        let pool = migrated_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(dir.path(), 1024);
        let job = seed_job(&pool, "Backend Engineer", "active", minutes(0)).await;

        let id = receive(&pool, &uploads, applicant(Some(job)), &[resume(), cover_letter()])
            .await
            .unwrap();
        assert_eq!(stored_files(dir.path()), 2);

        let entry = ApplicationSelector::new(&pool).get_by_id(id).await.unwrap().unwrap();
        assert_eq!(entry.job_title.as_deref(), Some("Backend Engineer"));
        assert!(entry.resume_path.unwrap().starts_with("resumes/"));
        assert!(entry.cover_letter_path.unwrap().ends_with(".docx"));
    }

    #[tokio::test]
    async fn test_receive_requires_a_resume() {
        let pool = migrated_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(dir.path(), 1024);

        let err = receive(&pool, &uploads, applicant(None), &[cover_letter()])
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "resume");
        assert_eq!(stored_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_receive_rejects_jobs_that_are_not_open() {
        let pool = migrated_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(dir.path(), 1024);
        let draft = seed_job(&pool, "Recruiter", "draft", minutes(0)).await;

        for job_id in [draft, draft + 100] {
            let err = receive(&pool, &uploads, applicant(Some(job_id)), &[resume()])
                .await
                .unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            let AppError::Validation(fields) = err else {
                panic!("expected validation error");
            };
            assert_eq!(fields[0].field, "job_id");
        }
        assert_eq!(stored_files(dir.path()), 0);
        let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM applications")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_failed_insert_removes_written_files() {
        let pool = migrated_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(dir.path(), 1024);
        sqlx::query("DROP TABLE applications")
            .execute(&pool)
            .await
            .unwrap();

        let err = receive(&pool, &uploads, applicant(None), &[resume(), cover_letter()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(stored_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_documents_are_served_with_disposition() {
        let pool = migrated_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(dir.path(), 1024);
        let id = receive(&pool, &uploads, applicant(None), &[resume()])
            .await
            .unwrap();

        let (stored, data) = fetch_document(&pool, &uploads, id, Document::Resume)
            .await
            .unwrap();
        assert_eq!(data, b"%PDF-1.4 resume");

        let response = document_response(&stored, data.clone(), "inline");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
        let name = stored.rsplit('/').next().unwrap();
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION].to_str().unwrap(),
            format!("inline; filename=\"{}\"", name)
        );
        let response = document_response(&stored, data, "attachment");
        assert!(
            response.headers()[CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .starts_with("attachment; ")
        );

        let err = fetch_document(&pool, &uploads, id, Document::CoverLetter)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("File")));

        std::fs::remove_file(dir.path().join(&stored)).unwrap();
        let err = fetch_document(&pool, &uploads, id, Document::Resume)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = fetch_document(&pool, &uploads, id + 1, Document::Resume)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Application")));
    }

    fn form(pairs: &[(&str, &str)]) -> Fields {
        Fields(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_form_maps_blanks_to_missing() {
        let application = form(&[
            ("name", " Ada "),
            ("email", "ada@example.com"),
            ("job_id", "4"),
            ("cgpa", "8.5"),
            ("graduation_year", ""),
            ("college", "   "),
        ])
        .application()
        .unwrap();
        assert_eq!(application.name, "Ada");
        assert_eq!(application.job_id, Some(4));
        assert_eq!(application.cgpa, Some(8.5));
        assert_eq!(application.graduation_year, None);
        assert_eq!(application.college, None);
    }

    #[test]
    fn test_form_rejects_non_numeric() {
        let err = form(&[("name", "Ada"), ("job_id", "four")])
            .application()
            .unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "job_id");
    }
}

use std::path::{Component, Path, PathBuf};

use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::{
    conf::settings,
    prelude::{AppError, Result},
};

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folder {
    Resumes,
    CoverLetters,
}

impl Folder {
    fn dir(&self) -> &'static str {
        match self {
            Folder::Resumes => "resumes",
            Folder::CoverLetters => "cover_letters",
        }
    }
}

/// Application documents on local disk, addressed by paths relative to `root`.
#[derive(Debug, Clone)]
pub struct Uploads {
    root: PathBuf,
    max_bytes: usize,
}

impl Uploads {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Uploads {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn from_settings() -> Self {
        Self::new(&settings.upload_dir, settings.max_upload_bytes)
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Checks size and type before anything is written.
    pub fn check(&self, field: &str, file_name: &str, data: &[u8]) -> Result<String> {
        let extension = extension(file_name);
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::invalid(
                field,
                "Invalid file type. Only PDF, DOC, DOCX files are allowed",
            ));
        }
        if data.is_empty() {
            return Err(AppError::invalid(field, "File is empty"));
        }
        if data.len() > self.max_bytes {
            return Err(AppError::PayloadTooLarge);
        }
        Ok(extension)
    }

    /// Writes under a fresh name and returns the stored relative path.
    pub async fn save(&self, folder: Folder, extension: &str, data: &[u8]) -> Result<String> {
        let dir = self.root.join(folder.dir());
        fs::create_dir_all(&dir).await?;
        let name = format!("{}.{}", Uuid::new_v4(), extension);
        let mut file = fs::File::create(dir.join(&name)).await?;
        file.write_all(data).await?;
        file.flush().await?;
        let stored = format!("{}/{}", folder.dir(), name);
        tracing::debug!("stored upload {}", &stored);
        Ok(stored)
    }

    pub async fn read(&self, stored: &str) -> Result<Vec<u8>> {
        let path = self.resolve(stored).ok_or(AppError::NotFound("File"))?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound("File")),
            Err(e) => Err(e.into()),
        }
    }

    /// Best effort; failures are logged and swallowed.
    pub async fn remove(&self, stored: &str) {
        let Some(path) = self.resolve(stored) else {
            tracing::warn!("refusing to remove {}", stored);
            return;
        };
        if let Err(e) = fs::remove_file(&path).await {
            tracing::warn!("could not remove {}: {}", path.display(), e);
        }
    }

    fn resolve(&self, stored: &str) -> Option<PathBuf> {
        let relative = Path::new(stored);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if stored.is_empty() || !plain {
            return None;
        }
        Some(self.root.join(relative))
    }
}

pub fn extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub fn content_type(file_name: &str) -> &'static str {
    match extension(file_name).as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type("resumes/a.PDF"), "application/pdf");
        assert_eq!(content_type("a.doc"), "application/msword");
        assert!(content_type("a.docx").contains("wordprocessingml"));
        assert_eq!(content_type("a.txt"), "application/octet-stream");
        assert_eq!(content_type("noext"), "application/octet-stream");
    }

    #[test]
    fn test_check_rejects_type_and_size() {
        let uploads = Uploads::new("/unused", 4);
        assert_eq!(uploads.check("resume", "cv.Docx", b"1234").unwrap(), "docx");
        assert!(matches!(
            uploads.check("resume", "cv.exe", b"12"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            uploads.check("resume", "cv.pdf", b""),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            uploads.check("resume", "cv.pdf", b"12345"),
            Err(AppError::PayloadTooLarge)
        ));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_save_read_remove() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(dir.path(), 1024);

        let stored = uploads.save(Folder::CoverLetters, "pdf", b"%PDF-1.4").await.unwrap();
        assert!(stored.starts_with("cover_letters/"));
        assert!(stored.ends_with(".pdf"));
        assert_eq!(uploads.read(&stored).await.unwrap(), b"%PDF-1.4");

        uploads.remove(&stored).await;
        assert!(matches!(uploads.read(&stored).await, Err(AppError::NotFound(_))));

        uploads.remove(&stored).await;
        assert!(logs_contain("could not remove"));
    }

    #[tokio::test]
    async fn test_paths_outside_root_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(dir.path().join("uploads"), 1024);
        std::fs::write(dir.path().join("secret.txt"), b"x").unwrap();
        assert!(matches!(
            uploads.read("../secret.txt").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(uploads.read("/etc/hosts").await, Err(AppError::NotFound(_))));
    }
}

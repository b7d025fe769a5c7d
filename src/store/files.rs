//! Attachment storage
//!
//! Accepts uploaded binary payloads and hands back stored file identifiers.
//! Identifiers flow through event payloads unchanged; nothing else in the
//! system interprets them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::debug;

/// Accepted upload content types
pub const ALLOWED_UPLOAD_TYPES: [&str; 3] = ["image/jpeg", "image/png", "application/pdf"];

/// Errors from attachment storage
#[derive(Debug, Error)]
pub enum FileError {
    #[error("unsupported attachment type '{0}', allowed: JPG, PNG, PDF")]
    UnsupportedType(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Disk-backed attachment store
#[derive(Clone, Debug)]
pub struct FileStore {
    upload_dir: PathBuf,
}

impl FileStore {
    /// Open the store rooted at `upload_dir`, creating it if needed
    pub fn open(upload_dir: impl AsRef<Path>) -> io::Result<Self> {
        let upload_dir = upload_dir.as_ref().to_path_buf();
        fs::create_dir_all(&upload_dir)?;
        Ok(Self { upload_dir })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Validate and store one uploaded payload, returning its identifier.
    ///
    /// Validation happens before anything touches disk, so a rejected upload
    /// fails the surrounding request without side effects.
    pub fn save(
        &self,
        original_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, FileError> {
        if !ALLOWED_UPLOAD_TYPES.contains(&content_type) {
            return Err(FileError::UnsupportedType(content_type.to_string()));
        }

        let stored = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name)
        );
        fs::write(self.upload_dir.join(&stored), bytes)?;
        debug!(file = %stored, size = bytes.len(), "attachment stored");

        Ok(stored)
    }
}

/// Strip anything that could escape the upload directory
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_disallowed_type() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let err = store.save("evil.exe", "application/x-msdownload", b"MZ");
        assert!(matches!(err, Err(FileError::UnsupportedType(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_save_keeps_original_name_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let stored = store.save("photo.png", "image/png", b"\x89PNG").unwrap();
        assert!(stored.ends_with("-photo.png"));
        assert!(dir.path().join(&stored).exists());
    }

    #[test]
    fn test_sanitizes_path_separators() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let stored = store.save("../../etc/passwd.pdf", "application/pdf", b"%PDF").unwrap();
        assert!(!stored.contains('/'));
        assert!(dir.path().join(&stored).exists());
    }
}

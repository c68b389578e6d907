//! Flat-directory file store behind the upload panel.
//!
//! Everything lives in one upload directory; the directory listing is the
//! index. Client-supplied names are validated down to a single path segment,
//! optionally checked against an extension allow-list and a byte ceiling, and
//! all operations on a given name are serialized through a per-name lock so
//! concurrent uploads of the same file cannot interleave.

pub mod name;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use thiserror::Error;
use tracing::debug;

pub use name::{validate_name, NameError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    InvalidName(#[from] NameError),

    #[error("File type not allowed")]
    DisallowedExtension,

    #[error("File exceeds the maximum upload size")]
    TooLarge,

    #[error("File {0} not found")]
    NotFound(String),

    #[error("Storage I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

/// One row of the panel listing.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub modified: SystemTime,
}

/// Adapter over a single flat upload directory.
pub struct FileStore {
    upload_dir: PathBuf,
    /// Lowercased extensions; empty means everything is allowed.
    allowed_extensions: Vec<String>,
    max_bytes: u64,
    // TODO: prune idle entries from the lock map
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl FileStore {
    /// Open the store, creating the upload directory if needed.
    pub fn open(
        upload_dir: impl Into<PathBuf>,
        allowed_extensions: Vec<String>,
        max_bytes: u64,
    ) -> Result<Self, StoreError> {
        let upload_dir = upload_dir.into();
        std::fs::create_dir_all(&upload_dir)?;
        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Ok(Self {
            upload_dir,
            allowed_extensions,
            max_bytes,
            locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.upload_dir.join(name)
    }

    fn name_lock(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    fn extension_allowed(&self, name: &str) -> bool {
        if self.allowed_extensions.is_empty() {
            return true;
        }
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .allowed_extensions
                .contains(&ext.to_ascii_lowercase()),
            _ => false,
        }
    }

    /// List every file in the upload directory, most recently modified first.
    pub async fn list(&self) -> Result<Vec<FileEntry>, StoreError> {
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.upload_dir).await?;
        while let Some(entry) = dir.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            entries.push(FileEntry {
                name,
                modified: metadata.modified()?,
            });
        }
        // Newest first; name breaks ties so the order is deterministic
        entries.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.name.cmp(&b.name)));
        Ok(entries)
    }

    /// Validate and write `content` to `<upload_dir>/<name>`, overwriting any
    /// existing file of that name.
    pub async fn save(&self, name: &str, content: &[u8]) -> Result<(), StoreError> {
        validate_name(name)?;
        if !self.extension_allowed(name) {
            return Err(StoreError::DisallowedExtension);
        }
        if content.len() as u64 > self.max_bytes {
            return Err(StoreError::TooLarge);
        }

        let lock = self.name_lock(name);
        let _guard = lock.lock().await;
        tokio::fs::write(self.file_path(name), content).await?;
        debug!(name, bytes = content.len(), "Stored file");
        Ok(())
    }

    /// Read the full content of a stored file.
    pub async fn retrieve(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        validate_name(name)?;
        let lock = self.name_lock(name);
        let _guard = lock.lock().await;
        match tokio::fs::read(self.file_path(name)).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a stored file. Deleting a missing name reports `NotFound`
    /// rather than failing hard.
    pub async fn delete(&self, name: &str) -> Result<(), StoreError> {
        validate_name(name)?;
        let lock = self.name_lock(name);
        let _guard = lock.lock().await;
        match tokio::fs::remove_file(self.file_path(name)).await {
            Ok(()) => {
                debug!(name, "Deleted file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir, extensions: &[&str], max_bytes: u64) -> FileStore {
        FileStore::open(
            dir.path(),
            extensions.iter().map(|e| e.to_string()).collect(),
            max_bytes,
        )
        .expect("Failed to open store")
    }

    #[tokio::test]
    async fn test_save_retrieve_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, &[], 1024);

        let content = b"hello\x00world\xffbytes";
        store.save("data.bin", content).await.unwrap();
        let read_back = store.retrieve("data.bin").await.unwrap();
        assert_eq!(read_back, content);
    }

    #[tokio::test]
    async fn test_save_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, &[], 1024);

        store.save("note.txt", b"first").await.unwrap();
        store.save("note.txt", b"second").await.unwrap();
        assert_eq!(store.retrieve("note.txt").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_delete_missing_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, &[], 1024);

        store.save("gone.txt", b"x").await.unwrap();
        store.delete("gone.txt").await.unwrap();
        let err = store.delete("gone.txt").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_retrieve_missing_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, &[], 1024);

        let err = store.retrieve("absent.txt").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_disallowed_extension_creates_no_file() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, &["txt", "pdf"], 1024);

        let err = store.save("payload.exe", b"mz").await.unwrap_err();
        assert!(matches!(err, StoreError::DisallowedExtension));
        assert!(!dir.path().join("payload.exe").exists());
    }

    #[tokio::test]
    async fn test_extension_match_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, &["TXT"], 1024);

        store.save("REPORT.TXT", b"ok").await.unwrap();
        store.save("report.txt", b"ok").await.unwrap();
    }

    #[tokio::test]
    async fn test_no_extension_rejected_when_list_configured() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, &["txt"], 1024);

        let err = store.save("README", b"x").await.unwrap_err();
        assert!(matches!(err, StoreError::DisallowedExtension));
    }

    #[tokio::test]
    async fn test_empty_allow_list_accepts_anything() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, &[], 1024);

        store.save("anything.xyz", b"x").await.unwrap();
        store.save("no_extension", b"x").await.unwrap();
    }

    #[tokio::test]
    async fn test_oversized_payload_rejected() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, &[], 8);

        let err = store.save("big.bin", b"123456789").await.unwrap_err();
        assert!(matches!(err, StoreError::TooLarge));
        assert!(!dir.path().join("big.bin").exists());
    }

    #[tokio::test]
    async fn test_traversal_name_rejected() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, &[], 1024);

        let err = store.save("../escape.txt", b"x").await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidName(NameError::PathSeparator)
        ));
        let err = store.retrieve("..").await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidName(NameError::SpecialDirectory)
        ));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, &[], 1024);

        store.save("older.txt", b"1").await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        store.save("newer.txt", b"2").await.unwrap();

        let listing = store.list().await.unwrap();
        let names: Vec<_> = listing.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["newer.txt", "older.txt"]);
    }
}

//! File persistence backend
//!
//! Stores each key as a JSON file under a base directory. Writes go to a
//! temporary sibling that is synced and then renamed over the target, so a
//! crash mid-write leaves the previous file intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{TrackerError, TrackerResult};
use crate::traits::PersistenceBackend;
use shared::{process_debug, ProcessId};

/// Real file system implementation
pub struct FileBackend {
    /// Base directory for all data
    base_dir: PathBuf,
}

impl FileBackend {
    /// Create a backend writing to ./data
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("./data"),
        }
    }

    /// Create with custom base directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Sanitize a store key for use as a file stem
    ///
    /// Keeps ASCII alphanumerics, `-` and `_`; everything else becomes `_`.
    fn sanitize_key(key: &str) -> String {
        let stem: String = key
            .trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();

        if stem.is_empty() {
            "store".to_string()
        } else {
            stem
        }
    }

    /// Path of the JSON file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", Self::sanitize_key(key)))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!(".{}.json.tmp", Self::sanitize_key(key)))
    }

    /// Map an I/O error to a transient or fatal tracker error
    fn classify_io(&self, operation: &str, key: &str, error: std::io::Error) -> TrackerError {
        match error.kind() {
            ErrorKind::OutOfMemory => TrackerError::StorageUnavailable {
                path: self.base_dir.display().to_string(),
                message: error.to_string(),
            },
            _ => TrackerError::persistence(operation, key, error.to_string()),
        }
    }

    async fn ensure_base_dir(&self) -> TrackerResult<()> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| TrackerError::StorageUnavailable {
                path: self.base_dir.display().to_string(),
                message: e.to_string(),
            })
    }

    async fn write_atomically(&self, key: &str, value: &str) -> std::io::Result<()> {
        let temp_path = self.temp_path_for(key);

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(value.as_bytes()).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, self.path_for(key)).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }
        Ok(())
    }
}

impl Default for FileBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistenceBackend for FileBackend {
    async fn load(&self, key: &str) -> TrackerResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.classify_io("load", key, e)),
        }
    }

    async fn save(&self, key: &str, value: &str) -> TrackerResult<()> {
        self.ensure_base_dir().await?;

        self.write_atomically(key, value)
            .await
            .map_err(|e| self.classify_io("save", key, e))?;

        process_debug!(ProcessId::current(), "💾 Wrote {} bytes to {}", value.len(), self.path_for(key).display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.base_dir.display().to_string()
    }
}

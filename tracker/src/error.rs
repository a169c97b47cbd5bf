//! Tracker-specific error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    /// Transient write/read failure; in-memory state stays authoritative
    #[error("Persistence {operation} failed for '{key}': {message}")]
    Persistence {
        operation: String,
        key: String,
        message: String,
    },

    /// The storage medium itself is gone or exhausted
    #[error("Storage unavailable at {path}: {message}")]
    StorageUnavailable { path: String, message: String },

    #[error("Configuration error: {field}")]
    Configuration { field: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrackerError {
    pub fn persistence(operation: impl Into<String>, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            operation: operation.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn config(field: impl Into<String>) -> Self {
        Self::Configuration { field: field.into() }
    }

    /// Whether this error must abort a batch instead of degrading to a warning
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_storage_unavailable_is_fatal() {
        assert!(TrackerError::StorageUnavailable {
            path: "/data".to_string(),
            message: "gone".to_string(),
        }
        .is_fatal());
        assert!(!TrackerError::persistence("save", "tracked_leads", "disk full").is_fatal());
        assert!(!TrackerError::config("recent_window_hours").is_fatal());
    }
}

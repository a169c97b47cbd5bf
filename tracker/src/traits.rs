//! Trait definitions with mockall annotations for testing
//!
//! The tracking engine reaches external storage only through these traits,
//! so tests can inject in-memory or failing backends and several independent
//! stores can coexist in one process.

use crate::error::TrackerResult;

/// Durable key/value storage for tracker state
///
/// Implementations must be crash-consistent: after `save` returns, a later
/// `load` sees either the previous or the new value, never a mix.
#[mockall::automock]
#[async_trait::async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Returns
    /// `Ok(None)` when nothing has been stored yet
    async fn load(&self, key: &str) -> TrackerResult<Option<String>>;

    /// Replace the value stored under `key`
    ///
    /// # Errors
    /// `TrackerError::Persistence` for transient failures,
    /// `TrackerError::StorageUnavailable` when the medium itself is gone
    async fn save(&self, key: &str, value: &str) -> TrackerResult<()>;

    /// Human-readable location for log lines
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_instantiation() {
        let mut backend = MockPersistenceBackend::new();
        backend.expect_load().returning(|_| Ok(None));

        assert!(backend.load("tracked_leads").await.unwrap().is_none());
    }
}

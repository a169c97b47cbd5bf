//! Test helpers and builder patterns for tracker tests
//!
//! Convenient constructors that keep test setup short and readable.

use lead_tracker::{LeadTracker, MemoryBackend, MockPersistenceBackend, TrackerConfig};
use shared::BatchResult;

/// Builder for trackers over an in-memory or mocked backend
pub struct TrackerBuilder {
    config: TrackerConfig,
    backend: MemoryBackend,
}

impl TrackerBuilder {
    pub fn new() -> Self {
        Self {
            config: TrackerConfig::default(),
            backend: MemoryBackend::new(),
        }
    }

    /// Share storage with another tracker (simulates a restart)
    pub fn with_backend(mut self, backend: MemoryBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_window_hours(mut self, hours: u32) -> Self {
        self.config.recent_window_hours = hours;
        self
    }

    pub fn with_store_key(mut self, key: &str) -> Self {
        self.config.store_key = key.to_string();
        self
    }

    pub async fn build(self) -> LeadTracker<MemoryBackend> {
        LeadTracker::open(self.backend, &self.config).await.unwrap()
    }
}

impl Default for TrackerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper functions for common test operations
pub struct TestHelpers;

impl TestHelpers {
    /// Tracker with defaults over fresh in-memory storage
    pub async fn simple_tracker() -> LeadTracker<MemoryBackend> {
        TrackerBuilder::new().build().await
    }

    /// Mock backend with no stored state that accepts every save
    pub fn accepting_mock() -> MockPersistenceBackend {
        let mut backend = MockPersistenceBackend::new();
        backend.expect_describe().returning(|| "mock".to_string());
        backend.expect_load().returning(|_| Ok(None));
        backend.expect_save().returning(|_, _| Ok(())).times(0..);
        backend
    }

    /// Assert both accounting invariants of a batch result
    pub fn assert_accounting(result: &BatchResult) {
        assert_eq!(
            result.total_processed,
            result.duplicates_rejected + result.new_leads + result.updated_leads,
            "total_processed must equal duplicates + new + updated"
        );
        assert_eq!(
            result.valid_leads.len(),
            result.new_leads + result.updated_leads,
            "valid_leads must hold exactly the new and updated leads"
        );
        assert!(result.is_consistent());
    }

    /// Assert a batch's counters in one line
    pub fn assert_counts(result: &BatchResult, new: usize, updated: usize, duplicates: usize) {
        assert_eq!(result.new_leads, new, "new_leads");
        assert_eq!(result.updated_leads, updated, "updated_leads");
        assert_eq!(result.duplicates_rejected, duplicates, "duplicates_rejected");
        Self::assert_accounting(result);
    }
}

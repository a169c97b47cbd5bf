//! Lead tracker entry point
//!
//! Wires the fingerprint store, classifier and stats reporter over one
//! injected persistence backend. Several trackers over different backends
//! (or store keys) can live side by side in one process.

use std::sync::Arc;

use shared::{process_info, process_warn, BatchResult, IngestReport, ProcessId, RawLead, Timestamp, TrackerStats};

use crate::config::TrackerConfig;
use crate::core::{Classifier, FingerprintStore, StatsReporter, TrackerExport};
use crate::error::TrackerResult;
use crate::traits::PersistenceBackend;

pub struct LeadTracker<B: PersistenceBackend> {
    store: Arc<FingerprintStore<B>>,
    classifier: Classifier<B>,
    reporter: StatsReporter<B>,
}

impl<B: PersistenceBackend> LeadTracker<B> {
    /// Open a tracker with default settings
    pub async fn new(backend: B) -> Self {
        let store = Arc::new(FingerprintStore::open(backend).await);
        Self::from_store(store, &TrackerConfig::default())
    }

    /// Open a tracker, validating `config` first
    pub async fn open(backend: B, config: &TrackerConfig) -> TrackerResult<Self> {
        config.validate()?;
        let store = Arc::new(FingerprintStore::open_with_key(backend, config.store_key.clone()).await);
        Ok(Self::from_store(store, config))
    }

    fn from_store(store: Arc<FingerprintStore<B>>, config: &TrackerConfig) -> Self {
        Self {
            classifier: Classifier::new(store.clone()),
            reporter: StatsReporter::with_window_hours(store.clone(), config.recent_window_hours),
            store,
        }
    }

    pub async fn classify_batch(&self, leads: Vec<RawLead>) -> TrackerResult<BatchResult> {
        self.classifier.classify_batch(leads).await
    }

    pub async fn classify_batch_at(&self, leads: Vec<RawLead>, now: Timestamp) -> TrackerResult<BatchResult> {
        self.classifier.classify_batch_at(leads, now).await
    }

    /// Classify a batch and merge the outcome with store-wide statistics
    pub async fn ingest(&self, leads: Vec<RawLead>) -> TrackerResult<IngestReport> {
        let result = self.classifier.classify_batch(leads).await?;
        let stats = self.reporter.current_stats().await;
        Ok(IngestReport::new(result, stats))
    }

    pub async fn stats(&self) -> TrackerStats {
        self.reporter.current_stats().await
    }

    pub async fn stats_at(&self, now: Timestamp) -> TrackerStats {
        self.reporter.stats_at(now).await
    }

    pub async fn export(&self) -> TrackerExport {
        self.reporter.export().await
    }

    /// Destructive: forget every tracked lead
    pub async fn reset(&self) -> TrackerResult<()> {
        process_info!(ProcessId::current(), "🗑️ Resetting all tracked leads in {}", self.store.backend().describe());
        self.store.clear().await
    }

    /// Retry persistence after a batch reported warnings
    pub async fn flush(&self) -> TrackerResult<()> {
        self.store.flush().await
    }

    /// Retry persistence if the latest mutation never reached the backend
    ///
    /// Returns whether a retry was needed.
    pub async fn persist_pending(&self) -> TrackerResult<bool> {
        if !self.store.is_dirty().await {
            return Ok(false);
        }

        process_warn!(
            ProcessId::current(),
            "⚠️ Tracked leads in {} are behind memory; retrying the save",
            self.store.backend().describe()
        );
        self.store.flush().await?;
        Ok(true)
    }

    pub fn store(&self) -> &Arc<FingerprintStore<B>> {
        &self.store
    }
}

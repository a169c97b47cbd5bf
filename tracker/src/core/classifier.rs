//! Batch classification
//!
//! Turns a batch of raw leads into new / updated / suppressed-duplicate
//! decisions against the fingerprint store. Persistence failures never drop
//! a lead from the output; they are reported as batch warnings so the caller
//! can retry the flush.

use std::sync::Arc;

use chrono::Utc;
use shared::{process_debug, process_info, process_warn, BatchResult, ClassifiedLead, ProcessId, RawLead, Timestamp};
use tokio::sync::Mutex;

use super::fingerprint::Fingerprint;
use super::identity::{self, IdentityKey};
use super::record::TrackedRecord;
use super::store::FingerprintStore;
use crate::error::TrackerResult;
use crate::traits::PersistenceBackend;

pub struct Classifier<B: PersistenceBackend> {
    store: Arc<FingerprintStore<B>>,
    /// Serializes batches so a lookup and its write are never interleaved
    /// with another batch touching the same key
    ingest_lock: Mutex<()>,
}

impl<B: PersistenceBackend> Classifier<B> {
    pub fn new(store: Arc<FingerprintStore<B>>) -> Self {
        Self {
            store,
            ingest_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<FingerprintStore<B>> {
        &self.store
    }

    /// Classify a batch against the wall clock
    pub async fn classify_batch<I>(&self, leads: I) -> TrackerResult<BatchResult>
    where
        I: IntoIterator<Item = RawLead>,
    {
        self.classify_batch_at(leads, Utc::now()).await
    }

    /// Classify a batch, stamping every write with `now`
    ///
    /// Leads are handled in input order, so a key seen twice in one batch is
    /// written in that order and the last sighting wins. Only a fatal storage
    /// error aborts the batch.
    pub async fn classify_batch_at<I>(&self, leads: I, now: Timestamp) -> TrackerResult<BatchResult>
    where
        I: IntoIterator<Item = RawLead>,
    {
        let _guard = self.ingest_lock.lock().await;
        let mut result = BatchResult::new();

        for lead in leads {
            self.classify_lead(lead, now, &mut result).await?;
        }

        process_info!(
            ProcessId::current(),
            "📊 Batch {}: {} processed, {} new ({} untracked), {} updated, {} duplicates rejected, {} warnings",
            result.batch_id,
            result.total_processed,
            result.new_leads,
            result.untracked,
            result.updated_leads,
            result.duplicates_rejected,
            result.warnings.len()
        );

        Ok(result)
    }

    async fn classify_lead(&self, lead: RawLead, now: Timestamp, result: &mut BatchResult) -> TrackerResult<()> {
        let Some(key) = identity::resolve(&lead) else {
            process_warn!(
                ProcessId::current(),
                "⚠️ No identity for lead '{}' (no email, name+phone or id); passing through untracked",
                lead.display_name()
            );
            result.record_emitted(ClassifiedLead::untracked(lead));
            return Ok(());
        };

        let current = Fingerprint::of(&lead);

        match self.store.get(&key).await {
            None => {
                let write = self.store.put(key.clone(), TrackedRecord::first_sighting(current, now)).await;
                Self::absorb_write(write, &key, result)?;

                process_debug!(ProcessId::current(), "🆕 New lead: {} ({})", lead.display_name(), key);
                result.record_emitted(ClassifiedLead::new_lead(lead, key.into_string()));
            }
            Some(existing) if existing.fingerprint == current => {
                process_debug!(ProcessId::current(), "🚫 Duplicate rejected: {} (no changes detected)", lead.display_name());
                result.record_duplicate();
            }
            Some(existing) => {
                let changed = current.changed_fields(&existing.fingerprint);
                let first_seen = existing.first_seen;
                let write = self.store.put(key.clone(), existing.with_change(current, now)).await;
                Self::absorb_write(write, &key, result)?;

                process_info!(
                    ProcessId::current(),
                    "✅ Lead updated: {} (changed: {})",
                    lead.display_name(),
                    changed.join(", ")
                );
                result.record_emitted(ClassifiedLead::updated(lead, key.into_string(), first_seen));
            }
        }

        Ok(())
    }

    /// Degrade a transient store failure to a batch warning
    fn absorb_write(write: TrackerResult<()>, key: &IdentityKey, result: &mut BatchResult) -> TrackerResult<()> {
        match write {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                process_warn!(ProcessId::current(), "⚠️ Tracked state for {} not persisted: {}", key, e);
                result.record_warning(Some(key.to_string()), e.to_string());
                Ok(())
            }
        }
    }
}

//! Fingerprint store
//!
//! Owns every [`TrackedRecord`]. The in-memory map is the source of truth for
//! the life of the process; its full contents are written to the persistence
//! backend after every mutation. A failed write leaves the in-memory state in
//! place and is retried implicitly by the next mutation (or explicitly through
//! [`FingerprintStore::flush`]).

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::{process_debug, process_info, process_warn, ProcessId, Timestamp};
use tokio::sync::{Mutex, RwLock};

use super::identity::IdentityKey;
use super::record::TrackedRecord;
use crate::error::TrackerResult;
use crate::traits::PersistenceBackend;

/// Backend key the store persists under unless told otherwise
pub const DEFAULT_STORE_KEY: &str = "tracked_leads";

/// Version written into every persisted document
pub const STORE_FORMAT_VERSION: u32 = 1;

/// On-disk shape of the store
#[derive(Debug, Deserialize)]
struct StoreDocument {
    version: u32,
    #[allow(dead_code)]
    saved_at: Timestamp,
    records: BTreeMap<IdentityKey, TrackedRecord>,
}

/// Borrowed twin of [`StoreDocument`] used when writing
#[derive(Serialize)]
struct StoreDocumentRef<'a> {
    version: u32,
    saved_at: Timestamp,
    records: BTreeMap<&'a IdentityKey, &'a TrackedRecord>,
}

struct StoreState {
    records: HashMap<IdentityKey, TrackedRecord>,
    /// Bumped on every mutation
    generation: u64,
}

/// Persisted mapping from identity key to tracked record
pub struct FingerprintStore<B: PersistenceBackend> {
    backend: B,
    key: String,
    state: RwLock<StoreState>,
    /// Generation of the last snapshot the backend accepted
    persisted: Mutex<u64>,
}

impl<B: PersistenceBackend> FingerprintStore<B> {
    /// Open a store under [`DEFAULT_STORE_KEY`]
    pub async fn open(backend: B) -> Self {
        Self::open_with_key(backend, DEFAULT_STORE_KEY).await
    }

    /// Open a store, loading whatever the backend holds under `key`
    ///
    /// Never fails: missing or unreadable data yields an empty store and a
    /// warning in the log.
    pub async fn open_with_key(backend: B, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = Self::load_records(&backend, &key).await;

        Self {
            backend,
            key,
            state: RwLock::new(StoreState { records, generation: 0 }),
            persisted: Mutex::new(0),
        }
    }

    async fn load_records(backend: &B, key: &str) -> HashMap<IdentityKey, TrackedRecord> {
        let text = match backend.load(key).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                process_debug!(ProcessId::current(), "📂 No tracked leads stored at {} ({}), starting empty", backend.describe(), key);
                return HashMap::new();
            }
            Err(e) => {
                process_warn!(ProcessId::current(), "⚠️ Could not load tracked leads from {}: {}. Starting empty", backend.describe(), e);
                return HashMap::new();
            }
        };

        let document = match serde_json::from_str::<StoreDocument>(&text) {
            Ok(document) => document,
            Err(e) => {
                process_warn!(ProcessId::current(), "⚠️ Tracked leads at {} are corrupt: {}. Starting empty", backend.describe(), e);
                return HashMap::new();
            }
        };

        if document.version != STORE_FORMAT_VERSION {
            process_warn!(
                ProcessId::current(),
                "⚠️ Tracked leads at {} use unsupported format version {} (expected {}). Starting empty",
                backend.describe(),
                document.version,
                STORE_FORMAT_VERSION
            );
            return HashMap::new();
        }

        let total = document.records.len();
        let records: HashMap<IdentityKey, TrackedRecord> = document
            .records
            .into_iter()
            .filter(|(identity, record)| {
                let valid = record.is_valid();
                if !valid {
                    process_warn!(ProcessId::current(), "⚠️ Dropping invalid tracked record for {}", identity);
                }
                valid
            })
            .collect();

        process_info!(ProcessId::current(), "📂 Loaded {} of {} tracked leads from {}", records.len(), total, backend.describe());
        records
    }

    /// Look up the record for `key`
    pub async fn get(&self, key: &IdentityKey) -> Option<TrackedRecord> {
        self.state.read().await.records.get(key).cloned()
    }

    /// Insert or overwrite the record for `key` and persist
    ///
    /// The in-memory write always takes effect; an error only reports that
    /// the backend did not accept the new state.
    pub async fn put(&self, key: IdentityKey, record: TrackedRecord) -> TrackerResult<()> {
        {
            let mut state = self.state.write().await;
            state.records.insert(key, record);
            state.generation += 1;
        }

        self.persist_latest().await
    }

    /// Remove every record and persist the empty store immediately
    pub async fn clear(&self) -> TrackerResult<()> {
        let removed = {
            let mut state = self.state.write().await;
            let removed = state.records.len();
            state.records.clear();
            state.generation += 1;
            removed
        };

        process_info!(ProcessId::current(), "🗑️ Cleared {} tracked leads", removed);
        self.persist_latest().await
    }

    /// Point-in-time copy of every record
    pub async fn snapshot(&self) -> Vec<TrackedRecord> {
        self.state.read().await.records.values().cloned().collect()
    }

    /// Point-in-time copy of every record with its key, in key order
    pub async fn entries(&self) -> BTreeMap<IdentityKey, TrackedRecord> {
        self.state
            .read()
            .await
            .records
            .iter()
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether the latest mutation has not reached the backend yet
    pub async fn is_dirty(&self) -> bool {
        let generation = self.state.read().await.generation;
        *self.persisted.lock().await < generation
    }

    /// Persist the current state if the backend is behind
    pub async fn flush(&self) -> TrackerResult<()> {
        self.persist_latest().await
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store_key(&self) -> &str {
        &self.key
    }

    fn encode(records: &HashMap<IdentityKey, TrackedRecord>) -> TrackerResult<String> {
        let document = StoreDocumentRef {
            version: STORE_FORMAT_VERSION,
            saved_at: Utc::now(),
            records: records.iter().collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Write the newest state to the backend unless it already landed
    ///
    /// Callers queue on the flush lock; whoever gets it writes the state as
    /// it is then, so writers that queued behind it find their generation
    /// persisted and skip the save. Encoding runs on a copy taken under the
    /// read lock, so lookups and puts never wait on serialization or I/O.
    async fn persist_latest(&self) -> TrackerResult<()> {
        let mut persisted = self.persisted.lock().await;

        let (generation, records) = {
            let state = self.state.read().await;
            if *persisted >= state.generation {
                return Ok(());
            }
            (state.generation, state.records.clone())
        };
        let payload = Self::encode(&records)?;

        match self.backend.save(&self.key, &payload).await {
            Ok(()) => {
                *persisted = generation;
                process_debug!(ProcessId::current(), "💾 Flushed tracked leads (generation {}) to {}", generation, self.backend.describe());
                Ok(())
            }
            Err(e) => {
                process_warn!(ProcessId::current(), "⚠️ Failed to flush tracked leads to {}: {}", self.backend.describe(), e);
                Err(e)
            }
        }
    }
}

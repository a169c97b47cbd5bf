//! Store-wide statistics
//!
//! Everything here reads a point-in-time copy of the store, so it is safe to
//! call while a batch is being classified.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use shared::{Timestamp, TrackerStats};

use super::identity::IdentityKey;
use super::record::TrackedRecord;
use super::store::FingerprintStore;
use crate::traits::PersistenceBackend;

/// Default trailing window for `recently_updated`
pub const DEFAULT_RECENT_WINDOW_HOURS: u32 = 24;

/// Full dump of tracked state for auditing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerExport {
    pub leads: BTreeMap<IdentityKey, TrackedRecord>,
    pub stats: TrackerStats,
    pub exported_at: Timestamp,
}

/// Compute statistics over a set of records
pub fn compute<'a, I>(records: I, now: Timestamp, window_hours: u32) -> TrackerStats
where
    I: IntoIterator<Item = &'a TrackedRecord>,
{
    // A window reaching past the earliest representable time covers everything
    let cutoff = now.checked_sub_signed(Duration::hours(i64::from(window_hours)));
    let mut stats = TrackerStats::empty(window_hours, now);

    for record in records {
        stats.total_tracked += 1;
        if cutoff.map_or(true, |cutoff| record.last_updated > cutoff) {
            stats.recently_updated += 1;
        }
        stats.oldest_first_seen = Some(match stats.oldest_first_seen {
            Some(oldest) => oldest.min(record.first_seen),
            None => record.first_seen,
        });
        stats.newest_last_updated = Some(match stats.newest_last_updated {
            Some(newest) => newest.max(record.last_updated),
            None => record.last_updated,
        });
    }

    stats
}

pub struct StatsReporter<B: PersistenceBackend> {
    store: Arc<FingerprintStore<B>>,
    window_hours: u32,
}

impl<B: PersistenceBackend> StatsReporter<B> {
    pub fn new(store: Arc<FingerprintStore<B>>) -> Self {
        Self::with_window_hours(store, DEFAULT_RECENT_WINDOW_HOURS)
    }

    pub fn with_window_hours(store: Arc<FingerprintStore<B>>, window_hours: u32) -> Self {
        Self { store, window_hours }
    }

    pub fn window_hours(&self) -> u32 {
        self.window_hours
    }

    pub async fn current_stats(&self) -> TrackerStats {
        self.stats_at(Utc::now()).await
    }

    pub async fn stats_at(&self, now: Timestamp) -> TrackerStats {
        let snapshot = self.store.snapshot().await;
        compute(&snapshot, now, self.window_hours)
    }

    pub async fn export(&self) -> TrackerExport {
        self.export_at(Utc::now()).await
    }

    /// Export every record together with statistics computed from the same copy
    pub async fn export_at(&self, now: Timestamp) -> TrackerExport {
        let leads = self.store.entries().await;
        let stats = compute(leads.values(), now, self.window_hours);

        TrackerExport {
            leads,
            stats,
            exported_at: now,
        }
    }
}

//! Persisted per-entity tracking state

use serde::{Deserialize, Serialize};
use shared::Timestamp;

use super::fingerprint::Fingerprint;

/// Tracking state for one identity key
///
/// Invariants: `update_count >= 1` and `first_seen <= last_updated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedRecord {
    pub fingerprint: Fingerprint,
    pub first_seen: Timestamp,
    pub last_updated: Timestamp,
    pub update_count: u64,
    #[serde(default)]
    pub previous_fingerprint: Option<Fingerprint>,
}

impl TrackedRecord {
    /// Record for the first sighting of an entity
    pub fn first_sighting(fingerprint: Fingerprint, now: Timestamp) -> Self {
        Self {
            fingerprint,
            first_seen: now,
            last_updated: now,
            update_count: 1,
            previous_fingerprint: None,
        }
    }

    /// Successor record after a sighting with a different fingerprint
    pub fn with_change(&self, fingerprint: Fingerprint, now: Timestamp) -> Self {
        Self {
            previous_fingerprint: Some(self.fingerprint.clone()),
            fingerprint,
            first_seen: self.first_seen,
            // A clock that stepped backwards must not break first_seen <= last_updated
            last_updated: now.max(self.first_seen),
            update_count: self.update_count.saturating_add(1),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.update_count >= 1 && self.first_seen <= self.last_updated
    }
}

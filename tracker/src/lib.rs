//! Lead tracking library
//!
//! Decides, for each lead handed in by a lead source, whether it is a
//! business never seen before, an unchanged duplicate of a known one, or an
//! update to a known one, and keeps that knowledge across restarts through a
//! pluggable persistence backend.

pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod tracker;
pub mod traits;

// Re-export commonly used types
pub use crate::core::{
    Classifier, Fingerprint, FingerprintStore, IdentityKey, StatsReporter, TrackedRecord, TrackerExport,
};
pub use config::TrackerConfig;
pub use error::{TrackerError, TrackerResult};
pub use services::{FileBackend, MemoryBackend};
pub use tracker::LeadTracker;
pub use traits::{MockPersistenceBackend, PersistenceBackend};

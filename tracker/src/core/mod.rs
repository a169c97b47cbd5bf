//! Core business logic modules
//!
//! Identity resolution, fingerprinting and the batch classifier are pure
//! logic; the store reaches storage only through `PersistenceBackend`.

pub mod classifier;
pub mod fingerprint;
pub mod identity;
pub mod normalize;
pub mod record;
pub mod stats;
pub mod store;

pub use classifier::Classifier;
pub use fingerprint::Fingerprint;
pub use identity::{resolve, IdentityKey};
pub use record::TrackedRecord;
pub use stats::{StatsReporter, TrackerExport, DEFAULT_RECENT_WINDOW_HOURS};
pub use store::{FingerprintStore, DEFAULT_STORE_KEY, STORE_FORMAT_VERSION};

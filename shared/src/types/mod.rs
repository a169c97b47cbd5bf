//! Core types used throughout the lead tracking system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

pub mod batch;
pub mod lead;
pub mod stats;

pub use batch::{BatchResult, BatchSummary, BatchWarning};
pub use lead::{ClassifiedLead, LeadStatus, RawLead};
pub use stats::{IngestReport, TrackerStats};

/// UTC timestamp used for every first-seen / last-updated value
pub type Timestamp = DateTime<Utc>;

/// Global process ID singleton - set once at startup
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Identifies which host is running the tracking engine in log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// The `lead-tracker` command line binary
    Cli,
    /// The engine linked into another program (or a test harness)
    Embedded,
}

impl ProcessId {
    /// Initialize the global process ID for the command line binary
    pub fn init_cli() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Cli)
    }

    /// Initialize the global process ID for an embedding host
    pub fn init_embedded() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Embedded)
    }

    /// Get the global process ID, falling back to `Embedded` when the host
    /// never initialized it
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Embedded)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::Cli => write!(f, "cli"),
            ProcessId::Embedded => write!(f, "embedded"),
        }
    }
}

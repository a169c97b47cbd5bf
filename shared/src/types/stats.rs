//! Store-wide statistics and the combined ingest report

use serde::{Deserialize, Serialize};

use super::batch::{BatchResult, BatchSummary, BatchWarning};
use super::lead::ClassifiedLead;
use super::Timestamp;

/// Aggregate view over every tracked record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerStats {
    pub total_tracked: usize,
    /// Records whose last update falls inside the trailing window
    pub recently_updated: usize,
    pub window_hours: u32,
    pub oldest_first_seen: Option<Timestamp>,
    pub newest_last_updated: Option<Timestamp>,
    pub computed_at: Timestamp,
}

impl TrackerStats {
    pub fn empty(window_hours: u32, computed_at: Timestamp) -> Self {
        Self {
            total_tracked: 0,
            recently_updated: 0,
            window_hours,
            oldest_first_seen: None,
            newest_last_updated: None,
            computed_at,
        }
    }
}

/// What the presentation layer receives after an ingest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub summary: BatchSummary,
    pub stats: TrackerStats,
    pub leads: Vec<ClassifiedLead>,
    pub warnings: Vec<BatchWarning>,
}

impl IngestReport {
    pub fn new(result: BatchResult, stats: TrackerStats) -> Self {
        let summary = BatchSummary::from(&result);
        Self {
            summary,
            stats,
            leads: result.valid_leads,
            warnings: result.warnings,
        }
    }
}

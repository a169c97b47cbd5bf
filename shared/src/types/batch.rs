//! Batch classification results

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lead::{ClassifiedLead, LeadStatus};

/// Non-fatal problem raised while classifying a batch
///
/// The affected lead is still classified and emitted; the warning tells the
/// caller that persistence should be retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchWarning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_key: Option<String>,
    pub message: String,
}

/// Result of classifying one batch of raw leads
///
/// The fields are public for serialization and reporting. Build results
/// through the `record_*` methods, which keep
/// `total_processed == valid_leads.len() + duplicates_rejected` and
/// `valid_leads.len() == new_leads + updated_leads`; editing counters by hand
/// can break that, and [`BatchResult::is_consistent`] will say so.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub batch_id: Uuid,
    pub total_processed: usize,
    pub valid_leads: Vec<ClassifiedLead>,
    pub duplicates_rejected: usize,
    pub new_leads: usize,
    pub updated_leads: usize,
    /// New leads without a derivable identity (subset of `new_leads`)
    pub untracked: usize,
    pub warnings: Vec<BatchWarning>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(batch_id: Uuid) -> Self {
        Self {
            batch_id,
            total_processed: 0,
            valid_leads: Vec::new(),
            duplicates_rejected: 0,
            new_leads: 0,
            updated_leads: 0,
            untracked: 0,
            warnings: Vec::new(),
        }
    }

    /// Record a lead that made it into the output
    pub fn record_emitted(&mut self, lead: ClassifiedLead) {
        self.total_processed += 1;
        match lead.status() {
            LeadStatus::New => {
                self.new_leads += 1;
                if !lead.is_tracked() {
                    self.untracked += 1;
                }
            }
            LeadStatus::Updated => self.updated_leads += 1,
        }
        self.valid_leads.push(lead);
    }

    /// Record an unchanged duplicate (suppressed from the output)
    pub fn record_duplicate(&mut self) {
        self.total_processed += 1;
        self.duplicates_rejected += 1;
    }

    pub fn record_warning(&mut self, identity_key: Option<String>, message: impl Into<String>) {
        self.warnings.push(BatchWarning {
            identity_key,
            message: message.into(),
        });
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check the accounting invariants
    pub fn is_consistent(&self) -> bool {
        self.total_processed == self.valid_leads.len() + self.duplicates_rejected
            && self.valid_leads.len() == self.new_leads + self.updated_leads
            && self.untracked <= self.new_leads
    }
}

impl Default for BatchResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter-only view of a [`BatchResult`] for summary display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch_id: Uuid,
    pub total_processed: usize,
    pub valid_leads: usize,
    pub duplicates_rejected: usize,
    pub new_leads: usize,
    pub updated_leads: usize,
    pub untracked: usize,
    pub warnings: usize,
}

impl From<&BatchResult> for BatchSummary {
    fn from(result: &BatchResult) -> Self {
        Self {
            batch_id: result.batch_id,
            total_processed: result.total_processed,
            valid_leads: result.valid_leads.len(),
            duplicates_rejected: result.duplicates_rejected,
            new_leads: result.new_leads,
            updated_leads: result.updated_leads,
            untracked: result.untracked,
            warnings: result.warnings.len(),
        }
    }
}

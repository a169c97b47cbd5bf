//! Identity resolution for raw leads
//!
//! Two leads resolving to the same key are the same business for tracking
//! purposes, however their other fields differ. Matching is exact on the
//! normalized key; there is no fuzzy matching.

use std::fmt;

use serde::{Deserialize, Serialize};
use shared::RawLead;

use super::normalize;

/// Deterministic key grouping all sightings of one business
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Wrap an already-derived key (e.g. one read back from storage)
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the identity key of a lead
///
/// Priority: email, then name + phone digits, then the source identifier.
/// Returns `None` when none of these is usable.
pub fn resolve(lead: &RawLead) -> Option<IdentityKey> {
    if let Some(email) = normalize::folded(lead.email.as_deref()) {
        return Some(IdentityKey(format!("email:{email}")));
    }

    let name = normalize::folded(lead.name.as_deref());
    let phone = normalize::digits(lead.phone.as_deref());
    if let (Some(name), Some(phone)) = (name, phone) {
        return Some(IdentityKey(format!("name_phone:{name}:{phone}")));
    }

    normalize::text(lead.id.as_deref()).map(|id| IdentityKey(format!("id:{id}")))
}

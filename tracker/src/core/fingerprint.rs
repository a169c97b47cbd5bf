//! Change-detection fingerprints
//!
//! A fingerprint is a normalized snapshot of the fields that count as a
//! meaningful change. Equality is structural over that fixed field set, so
//! key order, formatting noise and untracked extras never affect it.

use serde::{Deserialize, Serialize};
use shared::RawLead;

use super::normalize;

/// Normalized snapshot of the tracked attributes of a lead
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub name: Option<String>,
    pub category: Option<String>,
    /// Digits only
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
    pub verified: Option<bool>,
}

impl Fingerprint {
    /// Fingerprint the tracked fields of a lead
    pub fn of(lead: &RawLead) -> Self {
        Self {
            name: normalize::folded(lead.name.as_deref()),
            category: normalize::text(lead.category.as_deref()),
            phone: normalize::digits(lead.phone.as_deref()),
            email: normalize::folded(lead.email.as_deref()),
            website: normalize::folded(lead.website.as_deref()),
            address: normalize::text(lead.address.as_deref()),
            rating: lead.rating.filter(|r| r.is_finite()),
            reviews: lead.reviews,
            verified: lead.verified,
        }
    }

    /// Names of the fields that differ from `previous`, for log lines
    pub fn changed_fields(&self, previous: &Fingerprint) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.name != previous.name {
            changed.push("name");
        }
        if self.category != previous.category {
            changed.push("category");
        }
        if self.phone != previous.phone {
            changed.push("phone");
        }
        if self.email != previous.email {
            changed.push("email");
        }
        if self.website != previous.website {
            changed.push("website");
        }
        if self.address != previous.address {
            changed.push("address");
        }
        if self.rating != previous.rating {
            changed.push("rating");
        }
        if self.reviews != previous.reviews {
            changed.push("reviews");
        }
        if self.verified != previous.verified {
            changed.push("verified");
        }
        changed
    }
}

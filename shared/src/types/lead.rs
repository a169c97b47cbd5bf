//! Lead records as produced by lead sources and as handed to presentation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ProcessId, Timestamp};
use crate::errors::{SharedError, SharedResult};

/// Keys each typed field is read from, canonical name first
const NAME_KEYS: &[&str] = &["name", "businessName", "business_name"];
const CATEGORY_KEYS: &[&str] = &["category", "niche", "industry"];
const PHONE_KEYS: &[&str] = &["phone"];
const EMAIL_KEYS: &[&str] = &["email"];
const WEBSITE_KEYS: &[&str] = &["website"];
const ADDRESS_KEYS: &[&str] = &["address"];
const RATING_KEYS: &[&str] = &["rating", "google_rating"];
const REVIEWS_KEYS: &[&str] = &[
    "reviews",
    "reviewCount",
    "review_count",
    "totalReviews",
    "user_ratings_total",
    "google_reviews",
];
const VERIFIED_KEYS: &[&str] = &["verified", "isClaimed", "isVerified", "google_claimed"];
const ID_KEYS: &[&str] = &["id", "place_id", "placeId"];

/// A business lead exactly as a lead source produced it
///
/// Decoding never fails on a lead object. Each typed field takes the first
/// of its keys holding a usable value; the canonical name comes first, then
/// the names the place-search and enrichment providers use. Every value not
/// consumed that way lands in `extras` and is passed through untouched. A
/// canonical key whose value could not fill its field while an alias did
/// (the place-search `reviews` array next to `totalReviews`) is kept as
/// `<key>_raw`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RawLead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,

    /// Stable identifier supplied by the source (place id, CRM id, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Provider-specific fields, never used for identity or change detection
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl From<Map<String, Value>> for RawLead {
    fn from(mut object: Map<String, Value>) -> Self {
        Self {
            name: take(&mut object, NAME_KEYS, decode::text),
            category: take(&mut object, CATEGORY_KEYS, decode::text),
            phone: take(&mut object, PHONE_KEYS, decode::text),
            email: take(&mut object, EMAIL_KEYS, decode::text),
            website: take(&mut object, WEBSITE_KEYS, decode::text),
            address: take(&mut object, ADDRESS_KEYS, decode::text),
            rating: take(&mut object, RATING_KEYS, decode::number),
            reviews: take(&mut object, REVIEWS_KEYS, decode::count),
            verified: take(&mut object, VERIFIED_KEYS, decode::flag),
            id: take(&mut object, ID_KEYS, decode::text),
            extras: object,
        }
    }
}

/// Fill one typed field from `object`, consuming the value it came from
fn take<T>(object: &mut Map<String, Value>, keys: &[&str], decode: fn(&Value) -> Option<T>) -> Option<T> {
    let mut found = None;
    for key in keys {
        let decoded = match object.get(*key) {
            None => continue,
            Some(Value::Null) => None,
            Some(_) if found.is_some() => continue,
            Some(value) => match decode(value) {
                Some(decoded) => Some(decoded),
                None => continue,
            },
        };
        object.remove(*key);
        if decoded.is_some() {
            found = decoded;
        }
    }

    // The field serializes under the canonical key, so a leftover value there moves aside
    if found.is_some() {
        if let Some(leftover) = object.remove(keys[0]) {
            let key = free_key(object, keys[0]);
            object.insert(key, leftover);
        }
    }
    found
}

/// `<base>_raw`, extended until it does not clash with an existing key
fn free_key(object: &Map<String, Value>, base: &str) -> String {
    let mut key = format!("{base}_raw");
    while object.contains_key(&key) {
        key.push_str("_raw");
    }
    key
}

impl RawLead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_reviews(mut self, reviews: u64) -> Self {
        self.reviews = Some(reviews);
        self
    }

    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = Some(verified);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    /// Name used in log lines
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("<unnamed>")
    }

    /// Parse a batch of leads from JSON
    ///
    /// Accepts either a bare array of lead objects or a search response
    /// object carrying the array under `leads`. Only a document of the wrong
    /// shape is an error: an element that is not an object becomes a lead
    /// with no usable fields, so it passes through untracked.
    pub fn parse_batch(input: &str) -> SharedResult<Vec<RawLead>> {
        let value: Value = serde_json::from_str(input).map_err(|e| SharedError::DeserializationError {
            message: e.to_string(),
        })?;

        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut object) => match object.remove("leads") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(SharedError::InvalidLead {
                        message: "expected an array of leads or an object with a `leads` array".to_string(),
                    })
                }
            },
            _ => {
                return Err(SharedError::InvalidLead {
                    message: "expected an array of leads".to_string(),
                })
            }
        };

        Ok(items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(object) => RawLead::from(object),
                other => {
                    crate::process_warn!(
                        ProcessId::current(),
                        "⚠️ Lead #{} is not an object; passing it through untracked",
                        index
                    );
                    RawLead::new().with_extra("raw", other)
                }
            })
            .collect())
    }
}

/// Outcome attached to every lead that survives classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Updated,
}

/// A raw lead annotated with its classification
///
/// Constructed only through [`ClassifiedLead::new_lead`],
/// [`ClassifiedLead::untracked`] and [`ClassifiedLead::updated`], so a lead is
/// never both new and updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedLead {
    #[serde(flatten)]
    lead: RawLead,
    status: LeadStatus,
    is_new: bool,
    is_updated: bool,
    tracked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identity_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_seen: Option<Timestamp>,
}

/// Keys the classification fields serialize under, next to the flattened lead
const RESERVED_KEYS: [&str; 6] = ["status", "is_new", "is_updated", "tracked", "identity_key", "last_seen"];

/// Move provider extras that would clash with classification fields to `<key>_raw`
fn set_reserved_aside(mut lead: RawLead) -> RawLead {
    for reserved in RESERVED_KEYS {
        if let Some(value) = lead.extras.remove(reserved) {
            let key = free_key(&lead.extras, reserved);
            lead.extras.insert(key, value);
        }
    }
    lead
}

impl ClassifiedLead {
    /// First sighting of a tracked entity
    pub fn new_lead(lead: RawLead, identity_key: impl Into<String>) -> Self {
        Self {
            lead: set_reserved_aside(lead),
            status: LeadStatus::New,
            is_new: true,
            is_updated: false,
            tracked: true,
            identity_key: Some(identity_key.into()),
            last_seen: None,
        }
    }

    /// Lead without a derivable identity: emitted as new, never tracked
    pub fn untracked(lead: RawLead) -> Self {
        Self {
            lead: set_reserved_aside(lead),
            status: LeadStatus::New,
            is_new: true,
            is_updated: false,
            tracked: false,
            identity_key: None,
            last_seen: None,
        }
    }

    /// Known entity whose tracked attributes changed
    pub fn updated(lead: RawLead, identity_key: impl Into<String>, last_seen: Timestamp) -> Self {
        Self {
            lead: set_reserved_aside(lead),
            status: LeadStatus::Updated,
            is_new: false,
            is_updated: true,
            tracked: true,
            identity_key: Some(identity_key.into()),
            last_seen: Some(last_seen),
        }
    }

    pub fn lead(&self) -> &RawLead {
        &self.lead
    }

    pub fn into_lead(self) -> RawLead {
        self.lead
    }

    pub fn status(&self) -> LeadStatus {
        self.status
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn is_updated(&self) -> bool {
        self.is_updated
    }

    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    pub fn identity_key(&self) -> Option<&str> {
        self.identity_key.as_deref()
    }

    /// First sighting of the entity, present on updated leads only
    pub fn last_seen(&self) -> Option<Timestamp> {
        self.last_seen
    }
}

/// Tolerant field decoders for provider payloads
mod decode {
    use serde_json::Value;

    pub fn text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite())
    }

    pub fn count(value: &Value) -> Option<u64> {
        match value {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            }),
            Value::String(s) => s.trim().replace(',', "").parse::<u64>().ok(),
            _ => None,
        }
    }

    pub fn flag(value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            Value::Number(n) => n.as_u64().map(|v| v != 0),
            _ => None,
        }
    }
}

//! Test fixtures and data for tracker tests
//!
//! Consistent lead data used across all test suites.

use serde_json::json;
use shared::RawLead;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const PIZZA_EMAIL: &'static str = "joe@pizza.com";
    pub const PIZZA_KEY: &'static str = "email:joe@pizza.com";

    /// Joe's Pizza as first reported by the place-search provider
    pub fn pizza() -> RawLead {
        RawLead::new()
            .with_name("Joe's Pizza")
            .with_phone("555-0123")
            .with_email(Self::PIZZA_EMAIL)
            .with_rating(4.5)
    }

    /// Joe's Pizza after a new review moved the rating
    pub fn pizza_rerated() -> RawLead {
        Self::pizza().with_rating(4.6)
    }

    /// Joe's Pizza with only untracked fields changed
    pub fn pizza_with_description() -> RawLead {
        Self::pizza()
            .with_extra("description", json!("Family-run since 1972"))
            .with_extra("isInGooglePack", json!(true))
    }

    /// A lead carrying nothing but a name
    pub fn name_only() -> RawLead {
        RawLead::new().with_name("Mystery Diner")
    }

    /// A mixed batch of distinct businesses, each resolving by a different rule
    pub fn mixed_batch() -> Vec<RawLead> {
        vec![
            Self::pizza(),
            RawLead::new()
                .with_name("Bright Smile Dental")
                .with_phone("(310) 555-7788")
                .with_category("dental")
                .with_reviews(120),
            RawLead::new()
                .with_name("Quick Fix Plumbing")
                .with_id("place-quick-fix")
                .with_verified(true),
            Self::name_only(),
        ]
    }

    /// One place-details record as the place-search provider formats it
    pub fn place_details_json(total_reviews: u64, is_verified: bool) -> String {
        json!([{
            "placeId": "ChIJ-joes-pizza",
            "name": "Joe's Pizza",
            "address": "12 Main St, Springfield",
            "phone": "(555) 012-3",
            "website": "https://joespizza.example",
            "businessStatus": "OPERATIONAL",
            "rating": 4.5,
            "totalReviews": total_reviews,
            "priceLevel": 1,
            "types": ["restaurant", "food"],
            "reviews": [
                { "author_name": "Sam", "rating": 5, "text": "Great crust" },
                { "author_name": "Ana", "rating": 4, "text": "Busy on Fridays" }
            ],
            "isVerified": is_verified,
            "hasWebsite": true,
            "hasPhone": true
        }])
        .to_string()
    }

    /// Provider payload in the place-search response shape
    pub fn search_response_json() -> &'static str {
        r#"{
            "leads": [
                {
                    "businessName": "Restaurants Pro Services",
                    "ownerName": "Demo Owner",
                    "email": "info@restaurantspro.com",
                    "phone": "+1-555-DEMO",
                    "website": "https://restaurantspro.com",
                    "address": "123 Demo St, Miami",
                    "rating": 4.2,
                    "reviewCount": 25,
                    "isInGooglePack": false,
                    "isClaimed": true,
                    "description": "Professional restaurants services in Miami"
                },
                {
                    "businessName": "Miami Restaurants Solutions",
                    "email": "contact@miamirestaurants.com",
                    "phone": "+1-555-SAMPLE",
                    "rating": 4.7,
                    "reviewCount": 89,
                    "isInGooglePack": true,
                    "isClaimed": false
                }
            ],
            "totalSearched": 2,
            "isDemoData": true
        }"#
    }
}

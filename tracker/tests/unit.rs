//! Behavioural tests for lead classification
//!
//! Walk the documented scenarios and the classification properties through
//! the public tracker API over in-memory storage.

mod common;
use common::{TestFixtures, TestHelpers, TrackerBuilder};

use lead_tracker::{Fingerprint, IdentityKey};
use shared::{LeadStatus, RawLead};

fn pizza_key() -> IdentityKey {
    IdentityKey::from_raw(TestFixtures::PIZZA_KEY)
}

/// Scenario A: a never-seen lead is new
#[tokio::test]
async fn test_first_sighting_is_new() {
    let tracker = TestHelpers::simple_tracker().await;

    let result = tracker.classify_batch(vec![TestFixtures::pizza()]).await.unwrap();

    TestHelpers::assert_counts(&result, 1, 0, 0);
    assert_eq!(result.valid_leads.len(), 1);
    assert!(result.valid_leads[0].is_new());
    assert_eq!(result.valid_leads[0].status(), LeadStatus::New);
    assert_eq!(result.valid_leads[0].identity_key(), Some(TestFixtures::PIZZA_KEY));
}

/// Scenario B: resubmitting the identical record is rejected
#[tokio::test]
async fn test_identical_resubmission_is_rejected() {
    let tracker = TestHelpers::simple_tracker().await;
    tracker.classify_batch(vec![TestFixtures::pizza()]).await.unwrap();

    let result = tracker.classify_batch(vec![TestFixtures::pizza()]).await.unwrap();

    TestHelpers::assert_counts(&result, 0, 0, 1);
    assert!(result.valid_leads.is_empty());
}

/// Scenario C: a rating change is an update
#[tokio::test]
async fn test_rating_change_is_update() {
    let tracker = TestHelpers::simple_tracker().await;
    tracker.classify_batch(vec![TestFixtures::pizza()]).await.unwrap();

    let result = tracker.classify_batch(vec![TestFixtures::pizza_rerated()]).await.unwrap();

    TestHelpers::assert_counts(&result, 0, 1, 0);
    assert!(result.valid_leads[0].is_updated());
    assert!(!result.valid_leads[0].is_new());
}

/// Scenario D: a name-only lead is new but never tracked
#[tokio::test]
async fn test_name_only_lead_is_untracked() {
    let tracker = TestHelpers::simple_tracker().await;

    let result = tracker.classify_batch(vec![TestFixtures::name_only()]).await.unwrap();

    TestHelpers::assert_counts(&result, 1, 0, 0);
    assert_eq!(result.untracked, 1);
    assert!(result.valid_leads[0].is_new());
    assert!(!result.valid_leads[0].is_tracked());
    assert!(tracker.store().is_empty().await);

    // Submitting it again is still new: nothing was remembered
    let again = tracker.classify_batch(vec![TestFixtures::name_only()]).await.unwrap();
    TestHelpers::assert_counts(&again, 1, 0, 0);
}

/// Re-ingesting an unchanged lead never bumps its update count
#[tokio::test]
async fn test_unchanged_reingestion_is_idempotent() {
    let tracker = TestHelpers::simple_tracker().await;
    tracker.classify_batch(vec![TestFixtures::pizza()]).await.unwrap();
    let original = tracker.store().get(&pizza_key()).await.unwrap();

    for _ in 0..5 {
        let result = tracker.classify_batch(vec![TestFixtures::pizza()]).await.unwrap();
        TestHelpers::assert_counts(&result, 0, 0, 1);
    }

    let record = tracker.store().get(&pizza_key()).await.unwrap();
    assert_eq!(record, original);
    assert_eq!(record.update_count, 1);
}

/// New then changed: update count moves by exactly one and history is kept
#[tokio::test]
async fn test_change_is_monotonic() {
    let tracker = TestHelpers::simple_tracker().await;
    tracker.classify_batch(vec![TestFixtures::pizza()]).await.unwrap();
    let before = tracker.store().get(&pizza_key()).await.unwrap();

    tracker.classify_batch(vec![TestFixtures::pizza_rerated()]).await.unwrap();
    let after = tracker.store().get(&pizza_key()).await.unwrap();

    assert_eq!(after.update_count, before.update_count + 1);
    assert_eq!(after.previous_fingerprint, Some(Fingerprint::of(&TestFixtures::pizza())));
    assert_eq!(after.fingerprint, Fingerprint::of(&TestFixtures::pizza_rerated()));
    assert_eq!(after.first_seen, before.first_seen);
    assert!(after.last_updated >= before.last_updated);
}

/// Changing only untracked fields never produces an update
#[tokio::test]
async fn test_untracked_field_changes_are_ignored() {
    let tracker = TestHelpers::simple_tracker().await;
    tracker.classify_batch(vec![TestFixtures::pizza()]).await.unwrap();

    let result = tracker
        .classify_batch(vec![TestFixtures::pizza_with_description()])
        .await
        .unwrap();

    TestHelpers::assert_counts(&result, 0, 0, 1);
}

/// Formatting noise in identity and tracked fields is not a change
#[tokio::test]
async fn test_formatting_noise_is_a_duplicate() {
    let tracker = TestHelpers::simple_tracker().await;
    tracker.classify_batch(vec![TestFixtures::pizza()]).await.unwrap();

    let noisy = RawLead::new()
        .with_name("  JOE'S PIZZA")
        .with_phone("(555) 01-23")
        .with_email(" Joe@Pizza.COM ")
        .with_rating(4.5);
    let result = tracker.classify_batch(vec![noisy]).await.unwrap();

    TestHelpers::assert_counts(&result, 0, 0, 1);
}

/// Accounting holds for a mixed batch with repeats
#[tokio::test]
async fn test_mixed_batch_accounting() {
    let tracker = TestHelpers::simple_tracker().await;

    let first = tracker.classify_batch(TestFixtures::mixed_batch()).await.unwrap();
    TestHelpers::assert_counts(&first, 4, 0, 0);
    assert_eq!(first.untracked, 1);
    assert_eq!(tracker.store().len().await, 3);

    let mut second_batch = TestFixtures::mixed_batch();
    second_batch.push(TestFixtures::pizza_rerated());
    let second = tracker.classify_batch(second_batch).await.unwrap();

    // Three tracked duplicates, the name-only lead again, then the re-rating
    TestHelpers::assert_counts(&second, 1, 1, 3);
    assert_eq!(second.total_processed, 5);
}

/// Empty batches are fine
#[tokio::test]
async fn test_empty_batch() {
    let tracker = TestHelpers::simple_tracker().await;

    let result = tracker.classify_batch(Vec::new()).await.unwrap();

    TestHelpers::assert_counts(&result, 0, 0, 0);
    assert_eq!(result.total_processed, 0);
    assert!(!result.has_warnings());
}

/// Each identity rule resolves to its own key family
#[tokio::test]
async fn test_identity_rules_in_priority_order() {
    let tracker = TestHelpers::simple_tracker().await;

    let result = tracker.classify_batch(TestFixtures::mixed_batch()).await.unwrap();
    let keys: Vec<Option<&str>> = result.valid_leads.iter().map(|lead| lead.identity_key()).collect();

    assert_eq!(
        keys,
        vec![
            Some("email:joe@pizza.com"),
            Some("name_phone:bright smile dental:3105557788"),
            Some("id:place-quick-fix"),
            None,
        ]
    );
}

/// Stats window is configurable through the tracker config
#[tokio::test]
async fn test_stats_follow_configured_window() {
    let tracker = TrackerBuilder::new().with_window_hours(1).build().await;
    let two_hours_ago = chrono::Utc::now() - chrono::Duration::hours(2);

    tracker
        .classify_batch_at(vec![TestFixtures::pizza()], two_hours_ago)
        .await
        .unwrap();

    let stats = tracker.stats().await;
    assert_eq!(stats.total_tracked, 1);
    assert_eq!(stats.recently_updated, 0);
    assert_eq!(stats.window_hours, 1);
    assert_eq!(stats.oldest_first_seen, Some(two_hours_ago));
}

/// An oversized window counts every record instead of overflowing
#[tokio::test]
async fn test_oversized_window_does_not_overflow() {
    let tracker = TrackerBuilder::new().with_window_hours(u32::MAX).build().await;
    tracker.classify_batch(vec![TestFixtures::pizza()]).await.unwrap();

    let stats = tracker.stats().await;

    assert_eq!(stats.total_tracked, 1);
    assert_eq!(stats.recently_updated, 1);
}

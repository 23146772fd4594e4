//! Integration tests for the record store:
//! - Struggle submission and moderation
//! - Bookmarks
//! - Bookings
//! - Aggregations over the bundled fixtures

use chrono::{TimeZone, Utc};
use gapsense::{
    Category, FixedClock, Fixtures, NewStruggle, RecordStore, Severity, StruggleStatus,
};
use std::collections::HashSet;

fn fixed_store() -> RecordStore {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 24, 12, 0, 0).unwrap());
    let mut store = RecordStore::with_clock(Box::new(clock));
    store.seed(Fixtures::builtin().unwrap());
    store
}

// =====================================================================
// SUBMISSION AND MODERATION
// =====================================================================

#[test]
fn test_added_struggles_are_pending_with_unique_ids() {
    let mut store = RecordStore::new();
    let mut ids = HashSet::new();

    for i in 0..50 {
        let struggle = store.add_struggle(NewStruggle::new(
            &format!("Struggle {}", i),
            "",
            Category::Other,
            Severity::Low,
        ));
        assert_eq!(struggle.status, StruggleStatus::Pending);
        assert!(struggle.id.starts_with("struggle_"));
        assert!(ids.insert(struggle.id));
    }

    assert_eq!(store.struggles().len(), 50);
}

#[test]
fn test_added_struggle_uses_clock() {
    let mut store = fixed_store();
    let struggle = store.add_struggle(
        NewStruggle::new("Late night bug", "segfault", Category::Technical, Severity::High)
            .by_user("user_abc")
            .with_tags(vec!["c".to_string(), "c".to_string()]),
    );

    assert_eq!(struggle.timestamp, Utc.with_ymd_and_hms(2024, 1, 24, 12, 0, 0).unwrap());
    assert_eq!(struggle.tags, vec!["c"]);
    assert_eq!(store.struggle(&struggle.id), Some(struggle.clone()));
    assert_eq!(store.struggles_by_user("user_abc"), vec![struggle]);
}

#[test]
fn test_unknown_status_update_leaves_store_unchanged() {
    let mut store = fixed_store();
    let before = store.struggles();

    assert!(!store.update_struggle_status("nonexistent-id", StruggleStatus::Approved));
    assert!(!store.flag_struggle("nonexistent-id"));
    assert_eq!(store.struggles(), before);
}

#[test]
fn test_moderation_workflow() {
    let mut store = fixed_store();
    let struggle =
        store.add_struggle(NewStruggle::new("Q", "", Category::Career, Severity::Medium));

    assert!(store.approve_struggle(&struggle.id));
    assert!(store.reject_struggle(&struggle.id));
    assert!(store.flag_struggle(&struggle.id));
    assert!(!store.update_struggle_status(&struggle.id, StruggleStatus::Pending));

    let current = store.struggle(&struggle.id).unwrap();
    assert_eq!(current.status, StruggleStatus::Flagged);
}

#[test]
fn test_pending_queue_from_fixtures() {
    let store = fixed_store();
    let pending: Vec<String> = store
        .struggles_by_status(StruggleStatus::Pending)
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(pending, vec!["struggle_005", "struggle_007"]);
}

// =====================================================================
// BOOKMARKS
// =====================================================================

#[test]
fn test_bookmark_is_idempotent() {
    let mut store = fixed_store();
    store.bookmark("struggle_001");
    store.bookmark("struggle_001");
    assert_eq!(store.bookmarks(), vec!["struggle_001"]);

    store.unbookmark("struggle_001");
    assert!(!store.is_bookmarked("struggle_001"));
    store.unbookmark("struggle_001");
    assert!(store.bookmarks().is_empty());
}

#[test]
fn test_bookmarked_struggles_skip_dangling_ids() {
    let mut store = fixed_store();
    store.bookmark("struggle_012");
    store.bookmark("gone");
    store.bookmark("struggle_003");
    assert!(!store.toggle_bookmark("gone"));

    let ids: Vec<String> = store.bookmarked_struggles().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["struggle_003", "struggle_012"]);
}

// =====================================================================
// BOOKINGS
// =====================================================================

#[test]
fn test_book_session_snapshots_mentor_name() {
    let mut store = fixed_store();
    let booking = store
        .book_session("mentor_003", "Tue 10:00", true, Some("struggle_004"))
        .unwrap();

    assert!(booking.id.starts_with("booking_"));
    assert_eq!(booking.mentor_name, store.mentor("mentor_003").unwrap().name);
    assert_eq!(booking.struggle_id.as_deref(), Some("struggle_004"));
    assert!(booking.anonymous);
    assert_eq!(store.bookings(), vec![booking]);

    assert!(store.book_session("mentor_999", "Tue 10:00", false, None).is_none());
    assert_eq!(store.bookings().len(), 1);
}

// =====================================================================
// AGGREGATIONS
// =====================================================================

#[test]
fn test_fixture_counts() {
    let store = fixed_store();
    let categories = store.category_counts();

    assert_eq!(categories[&Category::Technical], 5);
    assert_eq!(categories[&Category::Academic], 2);
    assert_eq!(categories[&Category::Career], 2);
    assert_eq!(categories[&Category::MentalHealth], 2);
    assert_eq!(categories[&Category::Other], 1);
    assert_eq!(categories.values().sum::<usize>(), store.struggles().len());

    let severities = store.severity_counts();
    assert_eq!(severities[&Severity::High], 4);
    assert_eq!(severities[&Severity::Medium], 5);
    assert_eq!(severities[&Severity::Low], 3);

    assert_eq!(store.most_common_category(), Some(Category::Technical));
}

#[test]
fn test_three_struggle_counts() {
    let mut store = RecordStore::new();
    store.add_struggle(NewStruggle::new("a", "", Category::Technical, Severity::Low));
    store.add_struggle(NewStruggle::new("b", "", Category::Technical, Severity::High));
    store.add_struggle(NewStruggle::new("c", "", Category::Career, Severity::Medium));

    let categories = store.category_counts();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[&Category::Technical], 2);
    assert_eq!(categories[&Category::Career], 1);

    let severities = store.severity_counts();
    assert_eq!(severities.len(), 3);
    assert!(severities.values().all(|&n| n == 1));
}

#[test]
fn test_timeline_is_ascending_and_unique() {
    let store = fixed_store();
    let points = store.timeline_data();

    assert_eq!(points.len(), 9);
    assert!(points.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(points.iter().map(|p| p.count).sum::<usize>(), 12);
    assert_eq!(points[0].count, 2);
}

#[test]
fn test_heatmap_shape() {
    let store = fixed_store();
    let heatmap = store.activity_heatmap();

    let cells = heatmap.cells();
    assert_eq!(cells.len(), 168);
    assert_eq!(heatmap.total(), 12);
    // struggle_001: Monday 2024-01-15 14:23 UTC
    assert_eq!(heatmap.get(chrono::Weekday::Mon, 14), 1);

    assert_eq!(RecordStore::new().activity_heatmap().cells().len(), 168);
}

#[test]
fn test_empty_store_aggregations() {
    let store = RecordStore::new();
    assert!(store.category_counts().is_empty());
    assert!(store.severity_counts().is_empty());
    assert!(store.timeline_data().is_empty());
    assert_eq!(store.most_common_category(), None);
}

#[test]
fn test_mentors_by_category() {
    let store = fixed_store();
    let ids: Vec<String> = store
        .mentors_by_category(Category::Technical)
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec!["mentor_001", "mentor_004"]);

    let mentor = store.mentor_by_email("MENTOR.ALEX@gapsense.dev").unwrap();
    assert_eq!(mentor.id, "mentor_004");
}

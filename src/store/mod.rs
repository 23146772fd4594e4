//! Record Store - the single in-memory source of truth
//!
//! Owns struggles, mentors, bookings and bookmarks. Mutation goes through
//! `&mut self` methods; every read hands back owned copies so callers cannot
//! reach into internal state. Nothing is persisted.

pub mod clock;
pub mod fixtures;
pub mod records;

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::analytics::{self, Heatmap, TimelinePoint};
use crate::types::{Category, Severity, StruggleStatus};

pub use clock::{Clock, FixedClock, SystemClock};
pub use fixtures::Fixtures;
pub use records::{Booking, Mentor, NewBooking, NewStruggle, Struggle, ANONYMOUS_USER};

pub struct RecordStore {
    struggles: Vec<Struggle>,
    mentors: Vec<Mentor>,
    bookings: Vec<Booking>,
    /// Insertion ordered, never holds duplicates
    bookmarks: Vec<String>,
    clock: Box<dyn Clock>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("struggles", &self.struggles.len())
            .field("mentors", &self.mentors.len())
            .field("bookings", &self.bookings.len())
            .field("bookmarks", &self.bookmarks.len())
            .finish()
    }
}

impl RecordStore {
    /// Empty store on the wall clock
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Empty store with an injected time source
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            struggles: Vec::new(),
            mentors: Vec::new(),
            bookings: Vec::new(),
            bookmarks: Vec::new(),
            clock,
        }
    }

    /// Store seeded from a fixture snapshot. The snapshot is copied in and
    /// never consulted again.
    pub fn from_fixtures(fixtures: Fixtures) -> Self {
        let mut store = Self::new();
        store.seed(fixtures);
        store
    }

    /// Append a fixture snapshot to the current collections. Records whose id
    /// is already present are skipped so ids stay unique.
    pub fn seed(&mut self, fixtures: Fixtures) {
        debug!(
            "Seeding store with {} struggles and {} mentors",
            fixtures.struggles.len(),
            fixtures.mentors.len()
        );

        for struggle in fixtures.struggles {
            if self.struggles.iter().any(|s| s.id == struggle.id) {
                warn!("Skipping duplicate struggle id {}", struggle.id);
                continue;
            }
            self.struggles.push(struggle);
        }

        for mentor in fixtures.mentors {
            if self.mentors.iter().any(|m| m.id == mentor.id) {
                warn!("Skipping duplicate mentor id {}", mentor.id);
                continue;
            }
            self.mentors.push(mentor);
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // --- Struggles ---

    /// Record a new struggle as pending and return a copy of it
    pub fn add_struggle(&mut self, fields: NewStruggle) -> Struggle {
        let struggle = Struggle {
            id: format!("struggle_{}", Uuid::new_v4().simple()),
            title: fields.title,
            description: fields.description,
            category: fields.category,
            severity: fields.severity,
            tags: dedup_tags(fields.tags),
            timestamp: self.clock.now(),
            anonymous: fields.anonymous,
            user_id: fields.user_id,
            status: StruggleStatus::Pending,
        };

        debug!("Added struggle {} ({}, {})", struggle.id, struggle.category, struggle.severity);
        self.struggles.push(struggle.clone());
        struggle
    }

    /// Set a struggle's moderation status. Unknown ids and moves back to
    /// pending are ignored; returns whether the status was written.
    pub fn update_struggle_status(&mut self, id: &str, status: StruggleStatus) -> bool {
        let Some(struggle) = self.struggles.iter_mut().find(|s| s.id == id) else {
            debug!("Status update for unknown struggle {} ignored", id);
            return false;
        };

        if !struggle.status.can_transition_to(status) {
            warn!(
                "Refusing to move struggle {} from {} back to {}",
                id, struggle.status, status
            );
            return false;
        }

        debug!("Struggle {}: {} -> {}", id, struggle.status, status);
        struggle.status = status;
        true
    }

    pub fn approve_struggle(&mut self, id: &str) -> bool {
        self.update_struggle_status(id, StruggleStatus::Approved)
    }

    pub fn reject_struggle(&mut self, id: &str) -> bool {
        self.update_struggle_status(id, StruggleStatus::Rejected)
    }

    pub fn flag_struggle(&mut self, id: &str) -> bool {
        self.update_struggle_status(id, StruggleStatus::Flagged)
    }

    pub fn struggles(&self) -> Vec<Struggle> {
        self.struggles.clone()
    }

    pub fn struggle(&self, id: &str) -> Option<Struggle> {
        self.struggles.iter().find(|s| s.id == id).cloned()
    }

    pub fn struggles_by_user(&self, user_id: &str) -> Vec<Struggle> {
        self.struggles
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn struggles_by_status(&self, status: StruggleStatus) -> Vec<Struggle> {
        self.struggles
            .iter()
            .filter(|s| s.status == status)
            .cloned()
            .collect()
    }

    // --- Bookmarks ---

    pub fn bookmark(&mut self, id: &str) {
        if !self.is_bookmarked(id) {
            self.bookmarks.push(id.to_string());
        }
    }

    pub fn unbookmark(&mut self, id: &str) {
        self.bookmarks.retain(|b| b != id);
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.bookmarks.iter().any(|b| b == id)
    }

    /// Flip a bookmark and return the new state
    pub fn toggle_bookmark(&mut self, id: &str) -> bool {
        if self.is_bookmarked(id) {
            self.unbookmark(id);
            false
        } else {
            self.bookmark(id);
            true
        }
    }

    pub fn bookmarks(&self) -> Vec<String> {
        self.bookmarks.clone()
    }

    /// Bookmarked struggles in store order. Dangling ids are skipped.
    pub fn bookmarked_struggles(&self) -> Vec<Struggle> {
        self.struggles
            .iter()
            .filter(|s| self.is_bookmarked(&s.id))
            .cloned()
            .collect()
    }

    // --- Mentors and bookings ---

    pub fn mentors(&self) -> Vec<Mentor> {
        self.mentors.clone()
    }

    pub fn mentor(&self, id: &str) -> Option<Mentor> {
        self.mentors.iter().find(|m| m.id == id).cloned()
    }

    pub fn mentor_by_email(&self, email: &str) -> Option<Mentor> {
        self.mentors
            .iter()
            .find(|m| m.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub fn add_booking(&mut self, fields: NewBooking) -> Booking {
        let booking = Booking {
            id: format!("booking_{}", Uuid::new_v4().simple()),
            mentor_id: fields.mentor_id,
            mentor_name: fields.mentor_name,
            slot: fields.slot,
            anonymous: fields.anonymous,
            struggle_id: fields.struggle_id,
            created_at: self.clock.now(),
        };

        debug!("Booked {} with mentor {} at {}", booking.id, booking.mentor_id, booking.slot);
        self.bookings.push(booking.clone());
        booking
    }

    /// Book a session with a known mentor, snapshotting the mentor's name
    pub fn book_session(
        &mut self,
        mentor_id: &str,
        slot: &str,
        anonymous: bool,
        struggle_id: Option<&str>,
    ) -> Option<Booking> {
        let mentor_name = self.mentors.iter().find(|m| m.id == mentor_id)?.name.clone();

        Some(self.add_booking(NewBooking {
            mentor_id: mentor_id.to_string(),
            mentor_name,
            slot: slot.to_string(),
            anonymous,
            struggle_id: struggle_id.map(str::to_string),
        }))
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.bookings.clone()
    }

    // --- Aggregations ---

    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        analytics::category_counts(&self.struggles)
    }

    pub fn severity_counts(&self) -> BTreeMap<Severity, usize> {
        analytics::severity_counts(&self.struggles)
    }

    pub fn timeline_data(&self) -> Vec<TimelinePoint> {
        analytics::timeline(&self.struggles)
    }

    pub fn most_common_category(&self) -> Option<Category> {
        analytics::most_common_category(&self.struggles)
    }

    pub fn mentors_by_category(&self, category: Category) -> Vec<Mentor> {
        analytics::mentors_by_category(&self.mentors, category)
    }

    /// UTC activity grid
    pub fn activity_heatmap(&self) -> Heatmap {
        self.activity_heatmap_in(0)
    }

    pub fn activity_heatmap_in(&self, utc_offset_minutes: i32) -> Heatmap {
        Heatmap::build(&self.struggles, utc_offset_minutes)
    }
}

/// Drop repeated tags, keeping the first occurrence
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clock::MockClock;

    fn fixed_store() -> RecordStore {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .returning(|| Utc.with_ymd_and_hms(2024, 5, 6, 14, 0, 0).unwrap());
        RecordStore::with_clock(Box::new(clock))
    }

    fn mentor(id: &str, name: &str, expertise: Vec<Category>, rating: f64) -> Mentor {
        Mentor {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@gapsense.dev", id),
            expertise,
            specializations: vec![],
            rating,
            sessions_completed: 0,
            bio: String::new(),
            availability: vec![],
            time_slots: vec!["Mon 10:00".to_string()],
        }
    }

    #[test]
    fn test_add_struggle_assigns_id_time_and_pending() {
        let mut store = fixed_store();
        let created = store.add_struggle(NewStruggle::new(
            "Stuck on lifetimes",
            "borrow checker",
            Category::Technical,
            Severity::High,
        ));

        assert!(created.id.starts_with("struggle_"));
        assert_eq!(created.status, StruggleStatus::Pending);
        assert_eq!(created.timestamp, Utc.with_ymd_and_hms(2024, 5, 6, 14, 0, 0).unwrap());
        assert_eq!(created.user_id, ANONYMOUS_USER);
        assert_eq!(store.struggle(&created.id), Some(created));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = fixed_store();
        let mut ids = std::collections::HashSet::new();
        for i in 0..50 {
            let title = format!("t{}", i);
            let s =
                store.add_struggle(NewStruggle::new(&title, "", Category::Other, Severity::Low));
            assert_eq!(s.status, StruggleStatus::Pending);
            assert!(ids.insert(s.id));
        }
    }

    #[test]
    fn test_duplicate_tags_collapse() {
        let mut store = fixed_store();
        let s = store.add_struggle(
            NewStruggle::new("t", "", Category::Other, Severity::Low)
                .with_tags(vec!["a".into(), "b".into(), "a".into()]),
        );
        assert_eq!(s.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_status_update_unknown_id_is_noop() {
        let mut store = fixed_store();
        store.add_struggle(NewStruggle::new("t", "", Category::Other, Severity::Low));
        let before = store.struggles();

        assert!(!store.update_struggle_status("nonexistent-id", StruggleStatus::Approved));
        assert_eq!(store.struggles(), before);
    }

    #[test]
    fn test_moderation_transitions() {
        let mut store = fixed_store();
        let id = store
            .add_struggle(NewStruggle::new("t", "", Category::Other, Severity::Low))
            .id;

        assert!(store.approve_struggle(&id));
        assert_eq!(store.struggle(&id).unwrap().status, StruggleStatus::Approved);

        assert!(store.flag_struggle(&id));
        assert_eq!(store.struggle(&id).unwrap().status, StruggleStatus::Flagged);

        assert!(!store.update_struggle_status(&id, StruggleStatus::Pending));
        assert_eq!(store.struggle(&id).unwrap().status, StruggleStatus::Flagged);

        assert_eq!(store.struggles_by_status(StruggleStatus::Flagged).len(), 1);
        assert!(store.struggles_by_status(StruggleStatus::Pending).is_empty());
    }

    #[test]
    fn test_reads_are_copies() {
        let mut store = fixed_store();
        let id = store
            .add_struggle(NewStruggle::new("original", "", Category::Other, Severity::Low))
            .id;

        let mut copy = store.struggles();
        copy[0].title = "changed".to_string();
        copy.clear();

        assert_eq!(store.struggle(&id).unwrap().title, "original");
        assert_eq!(store.struggles().len(), 1);
    }

    #[test]
    fn test_bookmarks_are_idempotent() {
        let mut store = fixed_store();
        store.bookmark("s1");
        store.bookmark("s1");
        assert_eq!(store.bookmarks(), vec!["s1".to_string()]);

        store.unbookmark("s1");
        store.unbookmark("s1");
        assert!(!store.is_bookmarked("s1"));
        assert!(store.bookmarks().is_empty());

        assert!(store.toggle_bookmark("s2"));
        assert!(!store.toggle_bookmark("s2"));
    }

    #[test]
    fn test_bookmarked_struggles_skip_dangling_ids() {
        let mut store = fixed_store();
        let kept = store.add_struggle(NewStruggle::new("kept", "", Category::Other, Severity::Low));
        store.bookmark(&kept.id);
        store.bookmark("struggle_gone");

        let bookmarked = store.bookmarked_struggles();
        assert_eq!(bookmarked.len(), 1);
        assert_eq!(bookmarked[0].id, kept.id);
    }

    #[test]
    fn test_booking_snapshots_mentor_name() {
        let mut store = fixed_store();
        store.seed(Fixtures {
            struggles: vec![],
            mentors: vec![mentor("m1", "Ada", vec![Category::Technical], 4.8)],
        });

        let booking = store.book_session("m1", "Mon 10:00", true, Some("s1")).unwrap();
        assert_eq!(booking.mentor_name, "Ada");
        assert_eq!(booking.struggle_id.as_deref(), Some("s1"));
        assert!(booking.id.starts_with("booking_"));

        assert!(store.book_session("missing", "Mon 10:00", false, None).is_none());
        assert_eq!(store.bookings().len(), 1);
    }

    #[test]
    fn test_mentors_by_category_keeps_order() {
        let mut store = fixed_store();
        store.seed(Fixtures {
            struggles: vec![],
            mentors: vec![
                mentor("m1", "Ada", vec![Category::Technical], 4.1),
                mentor("m2", "Grace", vec![Category::Career], 4.9),
                mentor("m3", "Linus", vec![Category::Technical, Category::Career], 4.7),
            ],
        });

        let technical: Vec<String> = store
            .mentors_by_category(Category::Technical)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(technical, vec!["m1", "m3"]);
        assert_eq!(store.mentor_by_email("M2@GAPSENSE.DEV").unwrap().name, "Grace");
    }

    #[test]
    fn test_seed_skips_duplicate_ids() {
        let mut store = fixed_store();
        let first =
            store.add_struggle(NewStruggle::new("first", "", Category::Other, Severity::Low));

        let mut copy = first.clone();
        copy.title = "copy".to_string();
        let mut other = first.clone();
        other.id = "struggle_other".to_string();

        store.seed(Fixtures {
            struggles: vec![copy, other.clone(), other],
            mentors: vec![
                mentor("m1", "Ada", vec![Category::Technical], 4.0),
                mentor("m1", "Ada again", vec![Category::Career], 5.0),
            ],
        });

        assert_eq!(store.struggles().len(), 2);
        assert_eq!(store.struggle(&first.id).unwrap().title, "first");
        assert_eq!(store.mentors().len(), 1);
        assert_eq!(store.mentor("m1").unwrap().name, "Ada");

        assert!(store.approve_struggle("struggle_other"));
        assert_eq!(store.struggles_by_status(StruggleStatus::Approved).len(), 1);
    }

    #[test]
    fn test_end_to_end_counts() {
        let mut store = fixed_store();
        store.add_struggle(NewStruggle::new("a", "", Category::Technical, Severity::Low));
        store.add_struggle(NewStruggle::new("b", "", Category::Technical, Severity::High));
        store.add_struggle(NewStruggle::new("c", "", Category::Career, Severity::Medium));

        let categories = store.category_counts();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[&Category::Technical], 2);
        assert_eq!(categories[&Category::Career], 1);

        let severities = store.severity_counts();
        assert_eq!(severities[&Severity::Low], 1);
        assert_eq!(severities[&Severity::High], 1);
        assert_eq!(severities[&Severity::Medium], 1);

        assert_eq!(store.most_common_category(), Some(Category::Technical));
        assert_eq!(store.timeline_data().len(), 1);
        assert_eq!(store.activity_heatmap().cells().len(), 168);
        assert_eq!(store.activity_heatmap().get(chrono::Weekday::Mon, 14), 3);
    }
}

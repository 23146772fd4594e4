//! Per-user and per-mentor views

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::{
    average_severity, category_counts, most_common_category, severity_counts, timeline,
    top_mentors, TimelinePoint,
};
use crate::store::{Mentor, RecordStore, Struggle};
use crate::types::{Category, Severity, StruggleStatus};

/// Profile dashboard for one submitter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInsights {
    pub user_id: String,
    pub total: usize,
    pub category_counts: BTreeMap<Category, usize>,
    pub severity_counts: BTreeMap<Severity, usize>,
    pub timeline: Vec<TimelinePoint>,
    pub most_common_category: Option<Category>,
    pub average_severity: Option<Severity>,
    /// Best rated mentors for the user's most common category
    pub recommended_mentors: Vec<Mentor>,
    pub struggles: Vec<Struggle>,
}

pub fn user_insights(store: &RecordStore, user_id: &str, mentor_limit: usize) -> UserInsights {
    let struggles = store.struggles_by_user(user_id);
    let most_common = most_common_category(&struggles);

    let recommended_mentors = match most_common {
        Some(category) => top_mentors(&store.mentors(), category, mentor_limit),
        None => Vec::new(),
    };

    debug!("Built insights for {} over {} struggles", user_id, struggles.len());

    UserInsights {
        user_id: user_id.to_string(),
        total: struggles.len(),
        category_counts: category_counts(&struggles),
        severity_counts: severity_counts(&struggles),
        timeline: timeline(&struggles),
        most_common_category: most_common,
        average_severity: average_severity(&struggles),
        recommended_mentors,
        struggles,
    }
}

/// Approved struggles a mentor can help with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorWorkload {
    pub mentor: Mentor,
    pub relevant: Vec<Struggle>,
    pub category_counts: BTreeMap<Category, usize>,
    pub severity_counts: BTreeMap<Severity, usize>,
}

pub fn mentor_workload(store: &RecordStore, mentor_id: &str) -> Option<MentorWorkload> {
    let mentor = store.mentor(mentor_id)?;
    let relevant: Vec<Struggle> = store
        .struggles_by_status(StruggleStatus::Approved)
        .into_iter()
        .filter(|s| mentor.covers(s.category))
        .collect();

    Some(MentorWorkload {
        category_counts: category_counts(&relevant),
        severity_counts: severity_counts(&relevant),
        mentor,
        relevant,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Fixtures, NewStruggle};

    fn mentor(id: &str, expertise: Vec<Category>, rating: f64) -> Mentor {
        Mentor {
            id: id.to_string(),
            name: id.to_uppercase(),
            email: format!("{}@gapsense.dev", id),
            expertise,
            specializations: vec![],
            rating,
            sessions_completed: 0,
            bio: String::new(),
            availability: vec![],
            time_slots: vec![],
        }
    }

    fn seeded() -> RecordStore {
        let mut store = RecordStore::new();
        store.seed(Fixtures {
            struggles: vec![],
            mentors: vec![
                mentor("m1", vec![Category::Technical], 4.2),
                mentor("m2", vec![Category::Technical], 4.9),
                mentor("m3", vec![Category::Career], 5.0),
                mentor("m4", vec![Category::Technical], 4.5),
            ],
        });
        store
    }

    #[test]
    fn test_user_insights_recommend_top_rated() {
        let mut store = seeded();
        store.add_struggle(
            NewStruggle::new("a", "", Category::Technical, Severity::High).by_user("u1"),
        );
        store.add_struggle(
            NewStruggle::new("b", "", Category::Technical, Severity::High).by_user("u1"),
        );
        store.add_struggle(
            NewStruggle::new("c", "", Category::Career, Severity::Low).by_user("u1"),
        );
        store.add_struggle(
            NewStruggle::new("d", "", Category::Career, Severity::Low).by_user("u2"),
        );

        let insights = user_insights(&store, "u1", 2);
        assert_eq!(insights.total, 3);
        assert_eq!(insights.most_common_category, Some(Category::Technical));
        assert_eq!(insights.average_severity, Some(Severity::Medium));

        let ids: Vec<&str> = insights.recommended_mentors.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m4"]);
    }

    #[test]
    fn test_user_without_struggles() {
        let store = seeded();
        let insights = user_insights(&store, "nobody", 3);
        assert_eq!(insights.total, 0);
        assert!(insights.recommended_mentors.is_empty());
        assert_eq!(insights.most_common_category, None);
        assert_eq!(insights.average_severity, None);
    }

    #[test]
    fn test_mentor_workload_uses_approved_in_expertise() {
        let mut store = seeded();
        let tech =
            store.add_struggle(NewStruggle::new("a", "", Category::Technical, Severity::High));
        let career = store.add_struggle(NewStruggle::new("b", "", Category::Career, Severity::Low));
        store.add_struggle(NewStruggle::new("c", "", Category::Technical, Severity::Low));
        store.approve_struggle(&tech.id);
        store.approve_struggle(&career.id);

        let workload = mentor_workload(&store, "m1").unwrap();
        assert_eq!(workload.relevant.len(), 1);
        assert_eq!(workload.relevant[0].id, tech.id);
        assert_eq!(workload.severity_counts[&Severity::High], 1);

        assert!(mentor_workload(&store, "missing").is_none());
    }
}

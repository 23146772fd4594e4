//! Aggregations over struggle snapshots
//!
//! Everything here is a pure function of a slice of records, so the same
//! code serves the store-wide dashboard, a single user's profile and a
//! mentor's workload view.

pub mod filter;
pub mod heatmap;
pub mod insights;

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::store::{Mentor, Struggle};
use crate::types::{Category, Severity, StruggleStatus};

pub use filter::{community_struggles, StruggleFilter};
pub use heatmap::{Heatmap, HeatmapCell, DAYS, HOURS};
pub use insights::{mentor_workload, user_insights, MentorWorkload, UserInsights};

/// Struggles submitted on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub count: usize,
}

/// Number of struggles in each moderation state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationSummary {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub flagged: usize,
    pub total: usize,
}

pub fn category_counts(struggles: &[Struggle]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for struggle in struggles {
        *counts.entry(struggle.category).or_default() += 1;
    }
    counts
}

pub fn severity_counts(struggles: &[Struggle]) -> BTreeMap<Severity, usize> {
    let mut counts = BTreeMap::new();
    for struggle in struggles {
        *counts.entry(struggle.severity).or_default() += 1;
    }
    counts
}

/// Daily submission counts keyed by the UTC date of each timestamp,
/// ascending by date.
pub fn timeline(struggles: &[Struggle]) -> Vec<TimelinePoint> {
    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for struggle in struggles {
        *by_date.entry(struggle.timestamp.date_naive()).or_default() += 1;
    }

    by_date
        .into_iter()
        .map(|(date, count)| TimelinePoint { date, count })
        .collect()
}

/// Category with the most struggles. Ties go to whichever tied category
/// appears first in `struggles`.
pub fn most_common_category(struggles: &[Struggle]) -> Option<Category> {
    let mut order: Vec<Category> = Vec::new();
    let mut counts: HashMap<Category, usize> = HashMap::new();

    for struggle in struggles {
        let count = counts.entry(struggle.category).or_insert_with(|| {
            order.push(struggle.category);
            0
        });
        *count += 1;
    }

    let mut best: Option<(Category, usize)> = None;
    for category in order {
        let count = counts[&category];
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((category, count)),
        }
    }
    best.map(|(category, _)| category)
}

/// Mean severity weight bucketed back into a level: up to 1.5 is low,
/// up to 2.5 medium, anything above high.
pub fn average_severity(struggles: &[Struggle]) -> Option<Severity> {
    if struggles.is_empty() {
        return None;
    }

    let total: u32 = struggles.iter().map(|s| s.severity.weight()).sum();
    let avg = total as f64 / struggles.len() as f64;

    Some(if avg <= 1.5 {
        Severity::Low
    } else if avg <= 2.5 {
        Severity::Medium
    } else {
        Severity::High
    })
}

pub fn moderation_summary(struggles: &[Struggle]) -> ModerationSummary {
    let mut summary = ModerationSummary {
        total: struggles.len(),
        ..Default::default()
    };

    for struggle in struggles {
        match struggle.status {
            StruggleStatus::Pending => summary.pending += 1,
            StruggleStatus::Approved => summary.approved += 1,
            StruggleStatus::Rejected => summary.rejected += 1,
            StruggleStatus::Flagged => summary.flagged += 1,
        }
    }

    summary
}

/// Mentors with the given expertise, in collection order
pub fn mentors_by_category(mentors: &[Mentor], category: Category) -> Vec<Mentor> {
    mentors.iter().filter(|m| m.covers(category)).cloned().collect()
}

/// Best rated mentors for a category. Equal ratings keep collection order.
pub fn top_mentors(mentors: &[Mentor], category: Category, limit: usize) -> Vec<Mentor> {
    let mut matching = mentors_by_category(mentors, category);
    matching.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matching.truncate(limit);
    matching
}

/// The two-hour window, formatted `HH:00-HH:00`, in which the most
/// struggles were submitted. Hours are taken after shifting timestamps by
/// `utc_offset_minutes`. Earliest window wins ties.
pub fn most_active_time(struggles: &[Struggle], utc_offset_minutes: i32) -> Option<String> {
    if struggles.is_empty() {
        return None;
    }

    let offset = Duration::minutes(utc_offset_minutes as i64);
    let mut per_hour = [0usize; HOURS];
    for struggle in struggles {
        let hour = (struggle.timestamp + offset).hour() as usize;
        per_hour[hour] += 1;
    }

    let mut best_start = 0;
    let mut best_count = 0;
    for start in 0..HOURS {
        let count = per_hour[start] + per_hour[(start + 1) % HOURS];
        if count > best_count {
            best_start = start;
            best_count = count;
        }
    }

    Some(format!("{:02}:00-{:02}:00", best_start, (best_start + 2) % HOURS))
}

/// Timestamp of the newest struggle, used to anchor trend windows to the
/// data rather than the wall clock
pub fn latest_activity(struggles: &[Struggle]) -> Option<DateTime<Utc>> {
    struggles.iter().map(|s| s.timestamp).max()
}

/// Category whose submissions grew most between the previous window and
/// the window ending at `as_of`. Falls back to the most common category
/// when no category grew.
pub fn fastest_growing_category(
    struggles: &[Struggle],
    as_of: DateTime<Utc>,
    window_days: i64,
) -> Option<Category> {
    // windows reaching past the representable range cover all history
    let window = Duration::try_days(window_days.max(1)).unwrap_or(Duration::MAX);
    let recent_start = as_of
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let previous_start = recent_start
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut order: Vec<Category> = Vec::new();
    let mut growth: HashMap<Category, i64> = HashMap::new();

    for struggle in struggles {
        let delta = if struggle.timestamp > recent_start && struggle.timestamp <= as_of {
            1
        } else if struggle.timestamp > previous_start && struggle.timestamp <= recent_start {
            -1
        } else {
            continue;
        };

        let entry = growth.entry(struggle.category).or_insert_with(|| {
            order.push(struggle.category);
            0
        });
        *entry += delta;
    }

    let mut best: Option<(Category, i64)> = None;
    for category in order {
        let value = growth[&category];
        if value <= 0 {
            continue;
        }
        match best {
            Some((_, best_value)) if best_value >= value => {}
            _ => best = Some((category, value)),
        }
    }

    best.map(|(category, _)| category)
        .or_else(|| most_common_category(struggles))
}

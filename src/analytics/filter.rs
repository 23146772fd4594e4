//! Community listing filter

use serde::{Deserialize, Serialize};

use crate::store::{RecordStore, Struggle};
use crate::types::{Category, Severity, StruggleStatus};

/// Criteria for browsing struggles. Unset or empty criteria match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StruggleFilter {
    /// Case-insensitive substring of the title or description
    pub search: Option<String>,
    pub category: Option<Category>,
    pub severity: Option<Severity>,
    /// Case-insensitive substring of any tag
    pub tag: Option<String>,
}

impl StruggleFilter {
    pub fn search(mut self, query: &str) -> Self {
        self.search = Some(query.to_string());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    pub fn matches(&self, struggle: &Struggle) -> bool {
        if let Some(query) = non_empty_lower(&self.search) {
            if !struggle.title.to_lowercase().contains(&query)
                && !struggle.description.to_lowercase().contains(&query)
            {
                return false;
            }
        }

        if let Some(category) = self.category {
            if struggle.category != category {
                return false;
            }
        }

        if let Some(severity) = self.severity {
            if struggle.severity != severity {
                return false;
            }
        }

        if let Some(tag) = non_empty_lower(&self.tag) {
            if !struggle.tags.iter().any(|t| t.to_lowercase().contains(&tag)) {
                return false;
            }
        }

        true
    }

    /// Matching struggles, order preserved
    pub fn apply(&self, struggles: &[Struggle]) -> Vec<Struggle> {
        struggles.iter().filter(|s| self.matches(s)).cloned().collect()
    }
}

/// Approved struggles visible to the community, narrowed by `filter`
pub fn community_struggles(store: &RecordStore, filter: &StruggleFilter) -> Vec<Struggle> {
    filter.apply(&store.struggles_by_status(StruggleStatus::Approved))
}

fn non_empty_lower(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

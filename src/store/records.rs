//! Record shapes held by the store
//!
//! Field names serialize in camelCase so the bundled fixture files and any
//! JSON emitted by the CLI keep the shape the web client expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Category, Severity, StruggleStatus};

/// Author id recorded when nobody is logged in
pub const ANONYMOUS_USER: &str = "anonymous";

/// A user-submitted challenge under moderation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Struggle {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub severity: Severity,
    #[serde(default)]
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub anonymous: bool,
    pub user_id: String,
    #[serde(default)]
    pub status: StruggleStatus,
}

/// Fields supplied by the submit form. Id, timestamp and status are
/// assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStruggle {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub severity: Severity,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub anonymous: bool,
    pub user_id: String,
}

impl NewStruggle {
    pub fn new(title: &str, description: &str, category: Category, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            category,
            severity,
            tags: Vec::new(),
            anonymous: false,
            user_id: ANONYMOUS_USER.to_string(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn by_user(mut self, user_id: &str) -> Self {
        self.user_id = user_id.to_string();
        self
    }

    pub fn anonymous(mut self, anonymous: bool) -> Self {
        self.anonymous = anonymous;
        self
    }
}

/// A helper with expertise and bookable slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mentor {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub expertise: Vec<Category>,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub sessions_completed: u32,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub availability: Vec<String>,
    #[serde(default)]
    pub time_slots: Vec<String>,
}

impl Mentor {
    pub fn covers(&self, category: Category) -> bool {
        self.expertise.contains(&category)
    }
}

/// A booked mentor session. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub mentor_id: String,
    /// Mentor name at booking time; later renames do not rewrite history.
    pub mentor_name: String,
    pub slot: String,
    pub anonymous: bool,
    pub struggle_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the booking flow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub mentor_id: String,
    pub mentor_name: String,
    pub slot: String,
    pub anonymous: bool,
    pub struggle_id: Option<String>,
}

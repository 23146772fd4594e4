//! Shared vocabulary types
//!
//! Category, severity and moderation status are used by the store, the
//! tagger and every analytics view, so they live here to avoid circular
//! dependencies between those modules.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::GapsenseError;

/// Topic a struggle belongs to. Mentor expertise uses the same vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Technical,
    Academic,
    Career,
    #[serde(alias = "mental health")]
    MentalHealth,
    Other,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; 5] = [
        Category::Technical,
        Category::Academic,
        Category::Career,
        Category::MentalHealth,
        Category::Other,
    ];

    /// Wire name, as stored in fixtures and emitted as fallback tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Academic => "academic",
            Category::Career => "career",
            Category::MentalHealth => "mental-health",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = GapsenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Ok(Category::Technical),
            "academic" => Ok(Category::Academic),
            "career" => Ok(Category::Career),
            "mental-health" | "mental health" | "mental_health" => Ok(Category::MentalHealth),
            "other" => Ok(Category::Other),
            _ => Err(GapsenseError::UnknownCategory(s.to_string())),
        }
    }
}

/// Urgency of a struggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    /// Numeric weight used when averaging (1..=3)
    pub fn weight(&self) -> u32 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = GapsenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(GapsenseError::UnknownSeverity(s.to_string())),
        }
    }
}

/// Moderation state of a struggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StruggleStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Flagged,
}

impl StruggleStatus {
    /// Whether moderation may move a struggle from `self` to `next`.
    ///
    /// Every state is reachable from pending and resolved items may still be
    /// flagged or re-moderated, but nothing returns to pending.
    pub fn can_transition_to(&self, next: StruggleStatus) -> bool {
        match next {
            StruggleStatus::Pending => *self == StruggleStatus::Pending,
            _ => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StruggleStatus::Pending => "pending",
            StruggleStatus::Approved => "approved",
            StruggleStatus::Rejected => "rejected",
            StruggleStatus::Flagged => "flagged",
        }
    }
}

impl std::fmt::Display for StruggleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StruggleStatus {
    type Err = GapsenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(StruggleStatus::Pending),
            "approved" => Ok(StruggleStatus::Approved),
            "rejected" => Ok(StruggleStatus::Rejected),
            "flagged" => Ok(StruggleStatus::Flagged),
            _ => Err(GapsenseError::UnknownStatus(s.to_string())),
        }
    }
}

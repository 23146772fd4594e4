//! Tag Generator - keyword-based auto-tagging
//!
//! Scans a struggle description for keywords and maps them to topical tags.
//! Pure and deterministic: the same description and category always give
//! the same tags in the same order.

use crate::types::Category;

/// A tag that fires when any of its keywords is a substring of the
/// lower-cased description
struct TagRule {
    keywords: &'static [&'static str],
    tag: &'static str,
}

const fn rule(keywords: &'static [&'static str], tag: &'static str) -> TagRule {
    TagRule { keywords, tag }
}

const TECHNICAL_RULES: &[TagRule] = &[
    rule(&["react"], "react"),
    rule(&["javascript", "js"], "javascript"),
    rule(&["python"], "python"),
    rule(&["database", "sql"], "database"),
    rule(&["api"], "api"),
    rule(&["git"], "git"),
    rule(&["docker"], "docker"),
    rule(&["algorithm", "complexity"], "algorithms"),
];

const ACADEMIC_RULES: &[TagRule] = &[
    rule(&["assignment", "homework"], "assignments"),
    rule(&["exam", "test"], "exams"),
    rule(&["study", "studying"], "study-strategies"),
    rule(&["time", "schedule"], "time-management"),
];

const CAREER_RULES: &[TagRule] = &[
    rule(&["resume", "cv"], "resume"),
    rule(&["interview"], "interviews"),
    rule(&["job", "offer"], "job-search"),
    rule(&["network"], "networking"),
];

const MENTAL_HEALTH_RULES: &[TagRule] = &[
    rule(&["anxiety", "anxious"], "anxiety"),
    rule(&["stress", "stressed"], "stress"),
    rule(&["isolat", "lonely"], "loneliness"),
    rule(&["confident", "doubt"], "confidence"),
];

/// Applied after the category rules regardless of category
const COMMON_RULES: &[TagRule] = &[
    rule(&["help", "stuck"], "help-needed"),
    rule(&["urgent", "asap"], "urgent"),
];

fn category_rules(category: Category) -> &'static [TagRule] {
    match category {
        Category::Technical => TECHNICAL_RULES,
        Category::Academic => ACADEMIC_RULES,
        Category::Career => CAREER_RULES,
        Category::MentalHealth => MENTAL_HEALTH_RULES,
        Category::Other => &[],
    }
}

/// Derive tags from a description. Output follows rule-table order; when no
/// rule fires the category name is the single tag.
pub fn generate_tags(description: &str, category: Category) -> Vec<String> {
    let lowered = description.to_lowercase();

    let tags: Vec<String> = category_rules(category)
        .iter()
        .chain(COMMON_RULES)
        .filter(|rule| rule.keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|rule| rule.tag.to_string())
        .collect();

    if tags.is_empty() {
        vec![category.as_str().to_string()]
    } else {
        tags
    }
}

/// Union of typed and generated tags, first occurrence wins. Blank tags are
/// dropped and the rest trimmed.
pub fn merge_tags(user_tags: &[String], generated: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(user_tags.len() + generated.len());
    for tag in user_tags.iter().chain(generated) {
        let tag = tag.trim();
        if !tag.is_empty() && !merged.iter().any(|t| t == tag) {
            merged.push(tag.to_string());
        }
    }
    merged
}

//! GapSense - student struggle tracking core
//!
//! - In-memory record store for struggles, mentors, bookings and bookmarks
//! - Moderation workflow for submitted struggles
//! - Aggregate analytics (counts, timeline, activity heatmap, insights)
//! - Keyword-based auto-tagging
//! - Mock session provider
//!
//! # Example
//!
//! ```ignore
//! use gapsense::{Category, NewStruggle, RecordStore, Severity};
//!
//! let mut store = RecordStore::new();
//! let struggle = store.add_struggle(NewStruggle::new(
//!     "Stuck on hooks",
//!     "My React state resets",
//!     Category::Technical,
//!     Severity::High,
//! ));
//! store.approve_struggle(&struggle.id);
//! println!("{:?}", store.category_counts());
//! ```

pub mod types;
pub mod error;
pub mod store;
pub mod analytics;
pub mod tagging;
pub mod session;
pub mod config;
pub mod cli;

pub use types::{Category, Severity, StruggleStatus};
pub use error::{GapsenseError, Result};

pub use store::{
    Booking,
    Clock,
    FixedClock,
    Fixtures,
    Mentor,
    NewBooking,
    NewStruggle,
    RecordStore,
    Struggle,
    ANONYMOUS_USER,
};

pub use analytics::{
    Heatmap,
    HeatmapCell,
    StruggleFilter,
    TimelinePoint,
};

pub use tagging::{generate_tags, merge_tags};
pub use session::{Role, SessionStore, User};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Shorten `text` to at most `max_chars` characters, appending "..." when cut
pub fn truncate_safe(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

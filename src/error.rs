//! Typed errors for the library surface
//!
//! Store operations never fail; these cover parsing user input, loading
//! fixtures and the session file.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GapsenseError {
    #[error("unknown category '{0}' (expected technical, academic, career, mental-health, other)")]
    UnknownCategory(String),

    #[error("unknown severity '{0}' (expected low, medium or high)")]
    UnknownSeverity(String),

    #[error("unknown status '{0}' (expected pending, approved, rejected or flagged)")]
    UnknownStatus(String),

    #[error("unknown role '{0}' (expected student, admin or mentor)")]
    UnknownRole(String),

    #[error("missing credentials: {0} must not be empty")]
    MissingCredentials(&'static str),

    #[error("failed to parse fixture {path}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt session file {path}")]
    Session {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = GapsenseError> = std::result::Result<T, E>;

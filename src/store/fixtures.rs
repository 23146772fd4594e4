//! Fixture loader
//!
//! Supplies the initial struggles and mentors. The bundled snapshot is
//! compiled in; alternative files can be read from disk.

use std::path::{Path, PathBuf};
use tracing::info;

use super::records::{Mentor, Struggle};
use crate::error::{GapsenseError, Result};

const BUILTIN_STRUGGLES: &str = include_str!("../../fixtures/struggles.json");
const BUILTIN_MENTORS: &str = include_str!("../../fixtures/mentors.json");

/// Initial records handed to the store at startup
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub struggles: Vec<Struggle>,
    pub mentors: Vec<Mentor>,
}

impl Fixtures {
    /// The snapshot shipped with the crate
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            struggles: parse(BUILTIN_STRUGGLES, Path::new("fixtures/struggles.json"))?,
            mentors: parse(BUILTIN_MENTORS, Path::new("fixtures/mentors.json"))?,
        })
    }

    /// Parse fixture JSON already in memory
    pub fn from_json(struggles_json: &str, mentors_json: &str) -> Result<Self> {
        Ok(Self {
            struggles: parse(struggles_json, Path::new("<struggles>"))?,
            mentors: parse(mentors_json, Path::new("<mentors>"))?,
        })
    }

    /// Read fixture files. A missing path falls back to the bundled data for
    /// that collection.
    pub async fn load(struggles: Option<&Path>, mentors: Option<&Path>) -> Result<Self> {
        let builtin = Self::builtin()?;

        let struggles = match struggles {
            Some(path) => read_file(path).await?,
            None => builtin.struggles,
        };
        let mentors = match mentors {
            Some(path) => read_file(path).await?,
            None => builtin.mentors,
        };

        info!("Loaded {} struggles and {} mentors", struggles.len(), mentors.len());
        Ok(Self { struggles, mentors })
    }
}

async fn read_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| GapsenseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse(&contents, path)
}

fn parse<T: serde::de::DeserializeOwned>(json: &str, path: &Path) -> Result<Vec<T>> {
    serde_json::from_str(json).map_err(|source| GapsenseError::Fixture {
        path: PathBuf::from(path),
        source,
    })
}

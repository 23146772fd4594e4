//! Configuration management
//!
//! Fixture locations, analytics tuning and the session file location.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fixtures: FixturesConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Seed data files. Bundled data is used for any path left unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixturesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub struggles: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentors: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Offset applied before bucketing timestamps by day and hour
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Mentors suggested in personal and detail views
    #[serde(default = "default_recommended_mentors")]
    pub recommended_mentors: usize,
    /// Length of each window compared by the growth ranking
    #[serde(default = "default_growth_window_days")]
    pub growth_window_days: i64,
}

fn default_recommended_mentors() -> usize {
    3
}

fn default_growth_window_days() -> i64 {
    7
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            recommended_mentors: default_recommended_mentors(),
            growth_window_days: default_growth_window_days(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().context("Config path has no parent")?;

        std::fs::create_dir_all(parent).context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Session file, either configured or under the data directory
    pub fn session_path(&self) -> Result<PathBuf> {
        match &self.session.path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("session.json")),
        }
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "gapsense", "gapsense")
        .context("Could not determine home directory")
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

/// Get the data directory path
pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Print the current configuration
pub fn show_config(config: &Config) -> Result<()> {
    println!("Configuration ({})", config_path()?.display());
    println!();
    println!("Fixtures:");
    println!("  Struggles: {}", describe_path(config.fixtures.struggles.as_deref()));
    println!("  Mentors: {}", describe_path(config.fixtures.mentors.as_deref()));
    println!();
    println!("Analytics:");
    println!("  UTC offset: {} minutes", config.analytics.utc_offset_minutes);
    println!("  Recommended mentors: {}", config.analytics.recommended_mentors);
    println!("  Growth window: {} days", config.analytics.growth_window_days);
    println!();
    println!("Session:");
    println!("  File: {}", config.session_path()?.display());
    Ok(())
}

fn describe_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(bundled)".to_string())
}

/// Overwrite the config file with defaults
pub fn reset_config() -> Result<()> {
    Config::default().save()?;
    println!("Configuration reset to defaults");
    Ok(())
}

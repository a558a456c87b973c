//! Application configuration management.
//!
//! This module handles loading and saving persistent settings: the default
//! table length for reports, the duplicate-detection size floor, and how
//! long cached snapshots stay fresh. CLI flags always override these.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_top_count() -> usize {
    10
}

fn default_min_duplicate_size() -> u64 {
    1
}

fn default_cache_max_age_hours() -> u64 {
    24
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// How many rows the top-folders and top-files tables show.
    #[serde(default = "default_top_count")]
    pub top_count: usize,
    /// Smallest file size considered for duplicate detection, in bytes.
    #[serde(default = "default_min_duplicate_size")]
    pub min_duplicate_size: u64,
    /// Cached snapshots older than this are refreshed, in hours.
    #[serde(default = "default_cache_max_age_hours")]
    pub cache_max_age_hours: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_count: default_top_count(),
            min_duplicate_size: default_min_duplicate_size(),
            cache_max_age_hours: default_cache_max_age_hours(),
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Any failure (missing file, unreadable, malformed JSON) falls back to
    /// the defaults so startup never breaks on a bad config.
    pub fn load() -> Self {
        match Self::load_internal() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn load_internal() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save the configuration to the default platform-specific path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "dustat", "dustat")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}

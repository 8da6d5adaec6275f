//! Configuration handling for plugkit
//!
//! Configuration is stored in `catalog.toml` (catalog root) and
//! `~/.config/plugkit/config.toml` (global). Catalog values override
//! global ones; missing files mean defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory failing plugins are moved into
    pub quarantine_dir: String,

    /// Maximum icon size in bytes
    pub icon_max_bytes: u64,

    /// Move failing folders into the quarantine directory
    pub move_on_failure: bool,

    /// Tags pre-filled by `plugkit new`
    pub default_tags: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            quarantine_dir: ".needs-work".to_string(),
            icon_max_bytes: 5120,
            move_on_failure: true,
            default_tags: vec!["productivity".to_string()],
        }
    }
}

impl CatalogConfig {
    /// Loads configuration for a catalog root, layering global then local
    pub fn for_catalog(root: &Path) -> Result<Self> {
        let mut config = CatalogConfig::default();

        if let Some(global_path) = Self::global_path() {
            if global_path.exists() {
                config = Self::read_file(&global_path)?;
            }
        }

        let local_path = root.join("catalog.toml");
        if local_path.exists() {
            config = Self::read_file(&local_path)?;
        }

        Ok(config)
    }

    /// Path of the global config file, if a config dir can be determined
    pub fn global_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "plugkit").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }
}

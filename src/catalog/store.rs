//! Catalog discovery and plugin loading
//!
//! A catalog is a directory whose direct subdirectories are plugin
//! folders. Each folder holds `readme.md` (frontmatter + instructions),
//! `icon.svg`, and a `tests/` directory of end-to-end tests.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::CatalogConfig;
use super::frontmatter;
use crate::domain::PluginDef;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("No plugin named '{0}' in the catalog")]
    PluginNotFound(String),

    #[error("Plugin '{0}' has no readme.md")]
    MissingReadme(String),
}

/// A discovered plugin folder
#[derive(Debug, Clone)]
pub struct PluginFolder {
    /// Folder name, which must equal the definition's `id`
    pub id: String,

    /// Absolute path of the folder
    pub path: PathBuf,
}

impl PluginFolder {
    pub fn readme_path(&self) -> PathBuf {
        self.path.join("readme.md")
    }

    pub fn icon_path(&self) -> PathBuf {
        self.path.join("icon.svg")
    }

    pub fn tests_dir(&self) -> PathBuf {
        self.path.join("tests")
    }
}

/// A plugin folder with its parsed definition
#[derive(Debug, Clone)]
pub struct LoadedPlugin {
    pub folder: PluginFolder,
    pub def: PluginDef,

    /// Markdown body below the frontmatter
    pub body: String,
}

/// A plugin catalog rooted at a directory
pub struct Catalog {
    root: PathBuf,
    config: CatalogConfig,
}

impl Catalog {
    /// Opens the catalog at the given root
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CatalogError::NotADirectory(root).into());
        }

        let config = CatalogConfig::for_catalog(&root)?;
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Path a plugin folder would have in this catalog
    pub fn plugin_path(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// The quarantine directory for failing plugins
    pub fn quarantine_dir(&self) -> PathBuf {
        self.root.join(&self.config.quarantine_dir)
    }

    /// Discovers all plugin folders, sorted by id.
    ///
    /// Hidden directories and the quarantine directory are skipped.
    pub fn discover(&self) -> Result<Vec<PluginFolder>> {
        let mut folders = Vec::new();

        for entry in fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read catalog: {}", self.root.display()))?
        {
            let entry = entry.context("Failed to read catalog entry")?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') || name == self.config.quarantine_dir {
                continue;
            }

            folders.push(PluginFolder {
                id: name.to_string(),
                path,
            });
        }

        folders.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(folders)
    }

    /// Returns the folder for a plugin id, if it exists
    pub fn folder(&self, id: &str) -> Option<PluginFolder> {
        let path = self.plugin_path(id);
        if path.is_dir() {
            Some(PluginFolder {
                id: id.to_string(),
                path,
            })
        } else {
            None
        }
    }

    /// Loads and parses a plugin by id
    pub fn load(&self, id: &str) -> Result<LoadedPlugin> {
        let folder = self
            .folder(id)
            .ok_or_else(|| CatalogError::PluginNotFound(id.to_string()))?;

        Self::load_folder(folder)
    }

    /// Loads and parses a discovered folder
    pub fn load_folder(folder: PluginFolder) -> Result<LoadedPlugin> {
        let readme = folder.readme_path();
        if !readme.is_file() {
            return Err(CatalogError::MissingReadme(folder.id.clone()).into());
        }

        let content = fs::read_to_string(&readme)
            .with_context(|| format!("Failed to read {}", readme.display()))?;

        let (def, body) = frontmatter::parse_plugin(&content)
            .with_context(|| format!("Failed to parse {}", readme.display()))?;

        Ok(LoadedPlugin { folder, def, body })
    }

    /// Moves a plugin folder into the quarantine directory.
    ///
    /// If the destination already exists a numeric suffix is appended
    /// instead of overwriting. Returns the new location.
    pub fn quarantine(&self, folder: &PluginFolder) -> Result<PathBuf> {
        let quarantine = self.quarantine_dir();
        fs::create_dir_all(&quarantine)
            .with_context(|| format!("Failed to create {}", quarantine.display()))?;

        let mut dest = quarantine.join(&folder.id);
        let mut suffix = 1;
        while dest.exists() {
            dest = quarantine.join(format!("{}-{}", folder.id, suffix));
            suffix += 1;
        }

        fs::rename(&folder.path, &dest).with_context(|| {
            format!(
                "Failed to move {} to {}",
                folder.path.display(),
                dest.display()
            )
        })?;

        Ok(dest)
    }
}

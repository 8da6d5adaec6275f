//! # Catalog Layer
//!
//! Filesystem access to a plugin catalog: folder discovery, frontmatter
//! parsing of `readme.md` files, layered TOML configuration, and the
//! quarantine move for folders that fail validation.

mod config;
mod frontmatter;
mod store;

pub use config::CatalogConfig;
pub use frontmatter::{parse_plugin, render_plugin, split_frontmatter, FrontmatterError};
pub use store::{Catalog, LoadedPlugin, PluginFolder};

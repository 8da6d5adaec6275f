//! Frontmatter handling for plugin readme files
//!
//! A plugin's `readme.md` starts with a `---` delimited YAML block (the
//! definition) followed by a Markdown body (instructions for the agent).

use anyhow::{Context, Result};
use thiserror::Error;

use crate::domain::PluginDef;

#[derive(Debug, Error, PartialEq)]
pub enum FrontmatterError {
    #[error("Missing frontmatter (file must start with ---)")]
    MissingStart,

    #[error("Missing frontmatter end delimiter (---)")]
    MissingEnd,
}

/// Splits a readme into its YAML frontmatter and Markdown body
pub fn split_frontmatter(content: &str) -> Result<(&str, &str), FrontmatterError> {
    let content = content.trim_start();

    let rest = content
        .strip_prefix("---")
        .ok_or(FrontmatterError::MissingStart)?;

    let end = rest.find("\n---").ok_or(FrontmatterError::MissingEnd)?;

    let yaml = rest[..end].trim();
    let body = rest[end + 4..].trim_start_matches('-').trim_start();

    Ok((yaml, body))
}

/// Parses a readme into its definition and body
pub fn parse_plugin(content: &str) -> Result<(PluginDef, String)> {
    let (yaml, body) = split_frontmatter(content)?;

    let def: PluginDef = serde_yaml::from_str(yaml).context("Failed to parse frontmatter")?;

    Ok((def, body.to_string()))
}

/// Renders a definition and body back into readme form
pub fn render_plugin(def: &PluginDef, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(def).context("Failed to serialize frontmatter")?;

    let mut content = String::new();
    content.push_str("---\n");
    content.push_str(&yaml);
    content.push_str("---\n\n");
    content.push_str(body);

    if !content.ends_with('\n') {
        content.push('\n');
    }

    Ok(content)
}

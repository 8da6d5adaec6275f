//! Test coverage check
//!
//! Every declared tool must be exercised by at least one end-to-end test.
//! Tests call the host with the tool name as a string, so coverage is
//! established by scanning test files for quoted string literals rather
//! than parsing TypeScript.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::PluginDef;

use super::violation::Violation;

/// Collects every quoted string literal (single, double, or backtick)
pub fn scan_literals(content: &str) -> BTreeSet<String> {
    let mut literals = BTreeSet::new();
    let mut chars = content.char_indices();

    while let Some((start, c)) = chars.next() {
        if !matches!(c, '\'' | '"' | '`') {
            continue;
        }

        let rest = &content[start + 1..];
        let Some(end) = rest.find(c) else {
            break;
        };

        literals.insert(rest[..end].to_string());

        // Resume after the closing quote
        while let Some((i, _)) = chars.next() {
            if i >= start + 1 + end {
                break;
            }
        }
    }

    literals
}

/// Reads every file under the tests directory and collects its literals
pub fn literals_in_dir(tests_dir: &Path) -> Result<BTreeSet<String>> {
    let mut literals = BTreeSet::new();

    if !tests_dir.is_dir() {
        return Ok(literals);
    }

    for entry in fs::read_dir(tests_dir)
        .with_context(|| format!("Failed to read tests dir: {}", tests_dir.display()))?
    {
        let entry = entry.context("Failed to read tests entry")?;
        let path = entry.path();

        if path.is_dir() {
            literals.extend(literals_in_dir(&path)?);
        } else if let Ok(content) = fs::read_to_string(&path) {
            literals.extend(scan_literals(&content));
        }
    }

    Ok(literals)
}

/// Reports every declared tool that no test file mentions
pub fn check_coverage(def: &PluginDef, tests_dir: &Path) -> Result<Vec<Violation>> {
    let literals = literals_in_dir(tests_dir)?;

    Ok(def
        .tool_names()
        .into_iter()
        .filter(|name| !literals.contains(*name))
        .map(|name| Violation::UntestedTool {
            tool: name.to_string(),
        })
        .collect())
}

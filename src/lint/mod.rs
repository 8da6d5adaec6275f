//! # Test Lint
//!
//! End-to-end tests against the host follow a handful of boilerplate
//! conventions that code review alone keeps forgetting: skip instead of
//! fail when no credential is stored, clean up created entities in
//! `afterAll`, and use the shared unique-content helper so parallel runs
//! don't collide. Which conventions apply follows from the definition
//! itself, so the linter computes the required set and checks the test
//! sources for each.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{ActionDef, PluginDef};

/// A required test boilerplate pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPattern {
    /// Skip the suite when the host has no stored credential
    CredentialGuard,

    /// Delete created entities in an `afterAll` block
    CleanupAfterAll,

    /// Use the shared helper for collision-free test content
    UniqueContent,
}

impl TestPattern {
    /// Source markers that satisfy this pattern
    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            TestPattern::CredentialGuard => &["skipWithoutCredentials(", "Credential not found"],
            TestPattern::CleanupAfterAll => &["afterAll("],
            TestPattern::UniqueContent => &["uniqueContent("],
        }
    }

    /// True if the test source satisfies this pattern
    pub fn found_in(&self, source: &str) -> bool {
        self.markers().iter().any(|m| source.contains(m))
    }
}

impl std::fmt::Display for TestPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestPattern::CredentialGuard => write!(f, "credential-skip guard"),
            TestPattern::CleanupAfterAll => write!(f, "afterAll cleanup"),
            TestPattern::UniqueContent => write!(f, "uniqueContent helper"),
        }
    }
}

const CREATE_SEGMENTS: &[&str] = &["create", "add", "new"];
const DELETE_SEGMENTS: &[&str] = &["delete", "remove"];

fn final_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn is_create(name: &str, action: &ActionDef) -> bool {
    !action.readonly && CREATE_SEGMENTS.contains(&final_segment(name))
}

fn is_delete(name: &str) -> bool {
    DELETE_SEGMENTS.contains(&final_segment(name))
}

/// Computes which patterns a plugin's tests must contain
pub fn required_patterns(def: &PluginDef) -> Vec<TestPattern> {
    let mut patterns = Vec::new();

    if def.needs_credential() {
        patterns.push(TestPattern::CredentialGuard);
    }

    let has_create = def.tools().any(|(name, action)| is_create(name, action));
    let has_delete = def.tools().any(|(name, _)| is_delete(name));

    if has_create && has_delete {
        patterns.push(TestPattern::CleanupAfterAll);
    }
    if has_create {
        patterns.push(TestPattern::UniqueContent);
    }

    patterns
}

/// Concatenated source of every file under the tests directory
fn test_sources(tests_dir: &Path) -> Result<String> {
    let mut source = String::new();

    if !tests_dir.is_dir() {
        return Ok(source);
    }

    for entry in fs::read_dir(tests_dir)
        .with_context(|| format!("Failed to read tests dir: {}", tests_dir.display()))?
    {
        let entry = entry.context("Failed to read tests entry")?;
        let path = entry.path();

        if path.is_dir() {
            source.push_str(&test_sources(&path)?);
        } else if let Ok(content) = fs::read_to_string(&path) {
            source.push_str(&content);
            source.push('\n');
        }
    }

    Ok(source)
}

/// Lints one plugin, returning the required patterns its tests lack
pub fn lint_plugin(def: &PluginDef, tests_dir: &Path) -> Result<Vec<TestPattern>> {
    let source = test_sources(tests_dir)?;

    Ok(required_patterns(def)
        .into_iter()
        .filter(|p| !p.found_in(&source))
        .collect())
}

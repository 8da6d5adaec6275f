//! # Schema Validator
//!
//! Validates plugin folders against the definition format: frontmatter
//! shape, folder/id agreement, executor structure, template references,
//! response mappings, icon rules, and end-to-end test coverage.
//!
//! Failing folders are relocated into the catalog's quarantine directory
//! (`.needs-work` by default) unless moving is disabled.

mod coverage;
mod definition;
mod icon;
mod violation;

pub use coverage::{check_coverage, scan_literals};
pub use definition::check_definition;
pub use icon::check_icon;
pub use violation::Violation;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::catalog::{Catalog, PluginFolder};

/// Which plugin folders a validation run covers
#[derive(Debug, Clone)]
pub enum Selection {
    /// Every folder in the catalog
    All,

    /// Folders whose id contains the given substring
    Filter(String),

    /// Exactly the named folders; unknown names fail
    Names(Vec<String>),
}

/// Validation outcome for one plugin folder
#[derive(Debug)]
pub struct PluginReport {
    pub id: String,
    pub violations: Vec<Violation>,

    /// Where the folder was moved, when quarantined
    pub moved_to: Option<PathBuf>,
}

impl PluginReport {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Outcome of a whole validation run
#[derive(Debug)]
pub struct ValidationReport {
    pub generated_at: DateTime<Utc>,
    pub reports: Vec<PluginReport>,
}

impl ValidationReport {
    /// True if every selected folder passed
    pub fn passed(&self) -> bool {
        self.reports.iter().all(PluginReport::passed)
    }

    pub fn failed_count(&self) -> usize {
        self.reports.iter().filter(|r| !r.passed()).count()
    }

    /// JSON form for `--format json` and CI archiving
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "generated_at": self.generated_at.to_rfc3339(),
            "passed": self.passed(),
            "plugins": self.reports.iter().map(|r| {
                serde_json::json!({
                    "id": r.id,
                    "passed": r.passed(),
                    "violations": r.violations.iter().map(|v| v.to_string()).collect::<Vec<_>>(),
                    "moved_to": r.moved_to.as_ref().map(|p| p.display().to_string()),
                })
            }).collect::<Vec<_>>(),
        })
    }
}

/// Schema validator over a catalog
pub struct Validator<'a> {
    catalog: &'a Catalog,
    move_failed: bool,
}

impl<'a> Validator<'a> {
    pub fn new(catalog: &'a Catalog, move_failed: bool) -> Self {
        Self {
            catalog,
            move_failed,
        }
    }

    /// Validates the selected folders
    pub fn run(&self, selection: &Selection) -> Result<ValidationReport> {
        let mut reports = Vec::new();

        match selection {
            Selection::Names(names) => {
                for name in names {
                    match self.catalog.folder(name) {
                        Some(folder) => reports.push(self.validate_folder(folder)?),
                        None => reports.push(PluginReport {
                            id: name.clone(),
                            violations: vec![Violation::NotFound],
                            moved_to: None,
                        }),
                    }
                }
            }
            Selection::All => {
                for folder in self.catalog.discover()? {
                    reports.push(self.validate_folder(folder)?);
                }
            }
            Selection::Filter(substr) => {
                for folder in self.catalog.discover()? {
                    if folder.id.contains(substr.as_str()) {
                        reports.push(self.validate_folder(folder)?);
                    }
                }
            }
        }

        Ok(ValidationReport {
            generated_at: Utc::now(),
            reports,
        })
    }

    fn validate_folder(&self, folder: PluginFolder) -> Result<PluginReport> {
        let mut violations = Vec::new();

        let readme = folder.readme_path();
        if !readme.is_file() {
            violations.push(Violation::MissingReadme);
        } else {
            let content = std::fs::read_to_string(&readme)?;
            match crate::catalog::parse_plugin(&content) {
                Ok((def, _body)) => {
                    violations.extend(check_definition(&def, &folder.id));
                    violations.extend(check_coverage(&def, &folder.tests_dir())?);
                }
                Err(e) => violations.push(Violation::Frontmatter(format!("{:#}", e))),
            }
        }

        violations.extend(check_icon(
            &folder.icon_path(),
            self.catalog.config().icon_max_bytes,
        ));

        let moved_to = if !violations.is_empty() && self.move_failed {
            Some(self.catalog.quarantine(&folder)?)
        } else {
            None
        };

        Ok(PluginReport {
            id: folder.id,
            violations,
            moved_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const ICON: &str =
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 24 24\" fill=\"none\" stroke=\"currentColor\"><circle cx=\"12\" cy=\"12\" r=\"9\"/></svg>\n";

    fn write_valid_plugin(root: &Path, id: &str) {
        let dir = root.join(id);
        fs::create_dir_all(dir.join("tests")).unwrap();
        fs::write(
            dir.join("readme.md"),
            format!(
                r#"---
id: {id}
name: Demo
description: A demo plugin
tags: [demo]
actions:
  item.list:
    readonly: true
    rest:
      url: https://example.com/items
      response:
        mapping:
          id: "$[].id"
---

# Demo
"#
            ),
        )
        .unwrap();
        fs::write(dir.join("icon.svg"), ICON).unwrap();
        fs::write(
            dir.join("tests").join(format!("{id}.test.ts")),
            "await client.call('run_plugin', { tool: 'item.list' });\n",
        )
        .unwrap();
    }

    #[test]
    fn valid_catalog_passes() {
        let dir = TempDir::new().unwrap();
        write_valid_plugin(dir.path(), "demo");

        let catalog = Catalog::open(dir.path()).unwrap();
        let report = Validator::new(&catalog, true).run(&Selection::All).unwrap();

        assert!(report.passed());
        assert!(dir.path().join("demo").is_dir());
    }

    #[test]
    fn missing_icon_fails_and_quarantines() {
        let dir = TempDir::new().unwrap();
        write_valid_plugin(dir.path(), "demo");
        fs::remove_file(dir.path().join("demo/icon.svg")).unwrap();

        let catalog = Catalog::open(dir.path()).unwrap();
        let report = Validator::new(&catalog, true).run(&Selection::All).unwrap();

        assert!(!report.passed());
        assert!(!dir.path().join("demo").exists());
        assert!(dir.path().join(".needs-work/demo").is_dir());
    }

    #[test]
    fn move_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        write_valid_plugin(dir.path(), "demo");
        fs::remove_file(dir.path().join("demo/icon.svg")).unwrap();

        let catalog = Catalog::open(dir.path()).unwrap();
        let report = Validator::new(&catalog, false).run(&Selection::All).unwrap();

        assert!(!report.passed());
        assert!(dir.path().join("demo").is_dir());
    }

    #[test]
    fn unknown_name_is_a_failure() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::open(dir.path()).unwrap();

        let report = Validator::new(&catalog, true)
            .run(&Selection::Names(vec!["ghost".to_string()]))
            .unwrap();

        assert!(!report.passed());
        assert_eq!(report.reports[0].violations, vec![Violation::NotFound]);
    }

    #[test]
    fn filter_selects_matching_folders() {
        let dir = TempDir::new().unwrap();
        write_valid_plugin(dir.path(), "todoist");
        write_valid_plugin(dir.path(), "linear");

        let catalog = Catalog::open(dir.path()).unwrap();
        let report = Validator::new(&catalog, true)
            .run(&Selection::Filter("todo".to_string()))
            .unwrap();

        assert_eq!(report.reports.len(), 1);
        assert_eq!(report.reports[0].id, "todoist");
    }

    #[test]
    fn untested_tool_is_reported_with_name() {
        let dir = TempDir::new().unwrap();
        write_valid_plugin(dir.path(), "demo");

        // Add a second tool that no test mentions
        let readme = dir.path().join("demo/readme.md");
        let content = fs::read_to_string(&readme).unwrap();
        let content = content.replace(
            "actions:\n",
            "actions:\n  item.create:\n    rest:\n      url: https://example.com/items\n      method: POST\n",
        );
        fs::write(&readme, content).unwrap();

        let catalog = Catalog::open(dir.path()).unwrap();
        let report = Validator::new(&catalog, false).run(&Selection::All).unwrap();

        assert_eq!(
            report.reports[0].violations,
            vec![Violation::UntestedTool {
                tool: "item.create".to_string()
            }]
        );
    }

    #[test]
    fn json_report_shape() {
        let dir = TempDir::new().unwrap();
        write_valid_plugin(dir.path(), "demo");

        let catalog = Catalog::open(dir.path()).unwrap();
        let report = Validator::new(&catalog, true).run(&Selection::All).unwrap();
        let json = report.to_json();

        assert_eq!(json["passed"], serde_json::json!(true));
        assert_eq!(json["plugins"][0]["id"], serde_json::json!("demo"));
    }
}

//! `plugkit validate` command

use anyhow::{bail, Result};

use super::output::Output;
use crate::catalog::Catalog;
use crate::validate::{Selection, Validator};

pub fn run(
    catalog: &Catalog,
    output: &Output,
    names: Vec<String>,
    filter: Option<String>,
    no_move: bool,
) -> Result<()> {
    let selection = if !names.is_empty() {
        Selection::Names(names)
    } else if let Some(substr) = filter {
        Selection::Filter(substr)
    } else {
        Selection::All
    };

    let move_failed = !no_move && catalog.config().move_on_failure;
    let validator = Validator::new(catalog, move_failed);

    let report = validator.run(&selection)?;
    output.verbose_ctx("validate", &format!("checked {} folder(s)", report.reports.len()));

    if output.is_json() {
        output.data(&report.to_json());
    } else {
        for plugin in &report.reports {
            if plugin.passed() {
                output.line(&format!("ok   {}", plugin.id));
            } else {
                output.line(&format!("FAIL {}", plugin.id));
                for violation in &plugin.violations {
                    output.line(&format!("     - {}", violation));
                }
                if let Some(moved) = &plugin.moved_to {
                    output.line(&format!("     moved to {}", moved.display()));
                }
            }
        }

        output.blank();
        output.line(&format!(
            "{} passed, {} failed",
            report.reports.len() - report.failed_count(),
            report.failed_count()
        ));
    }

    if !report.passed() {
        bail!("{} plugin(s) failed validation", report.failed_count());
    }

    Ok(())
}

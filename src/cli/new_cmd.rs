//! `plugkit new` command

use anyhow::Result;

use super::output::Output;
use crate::catalog::Catalog;
use crate::scaffold::{scaffold, ScaffoldOptions};

pub fn run(
    catalog: &Catalog,
    output: &Output,
    name: &str,
    readonly: bool,
    local: bool,
) -> Result<()> {
    let opts = ScaffoldOptions { readonly, local };
    let created = scaffold(
        catalog.root(),
        name,
        opts,
        &catalog.config().default_tags,
    )?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": name,
            "path": created.display().to_string(),
            "readonly": readonly,
            "local": local,
        }));
    } else {
        output.success(&format!("Created plugin '{}' at {}", name, created.display()));
        output.line("Next steps:");
        output.line(&format!("  1. Fill in {}/readme.md", name));
        output.line(&format!("  2. Replace {}/icon.svg", name));
        output.line(&format!("  3. Run: plugkit validate {}", name));
    }

    Ok(())
}

//! `plugkit lint` command

use anyhow::{bail, Result};

use super::output::Output;
use crate::catalog::Catalog;
use crate::lint::lint_plugin;

pub fn run(catalog: &Catalog, output: &Output, names: Vec<String>) -> Result<()> {
    let folders = if names.is_empty() {
        catalog.discover()?
    } else {
        let mut folders = Vec::new();
        for name in &names {
            match catalog.folder(name) {
                Some(folder) => folders.push(folder),
                None => bail!("No plugin named '{}' in the catalog", name),
            }
        }
        folders
    };

    let mut failed = 0;
    let mut results = Vec::new();

    for folder in folders {
        let id = folder.id.clone();
        match Catalog::load_folder(folder) {
            Ok(plugin) => {
                let missing = lint_plugin(&plugin.def, &plugin.folder.tests_dir())?;
                if !missing.is_empty() {
                    failed += 1;
                }
                results.push((id, missing, None));
            }
            Err(e) => {
                failed += 1;
                results.push((id, Vec::new(), Some(format!("{:#}", e))));
            }
        }
    }

    if output.is_json() {
        let items: Vec<_> = results
            .iter()
            .map(|(id, missing, error)| {
                serde_json::json!({
                    "id": id,
                    "missing": missing.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
                    "error": error,
                })
            })
            .collect();
        output.data(&items);
    } else {
        for (id, missing, error) in &results {
            if let Some(error) = error {
                output.line(&format!("FAIL {} (unreadable: {})", id, error));
            } else if missing.is_empty() {
                output.line(&format!("ok   {}", id));
            } else {
                output.line(&format!("FAIL {}", id));
                for pattern in missing {
                    output.line(&format!("     - missing {}", pattern));
                }
            }
        }
    }

    if failed > 0 {
        bail!("{} plugin(s) missing required test patterns", failed);
    }

    Ok(())
}

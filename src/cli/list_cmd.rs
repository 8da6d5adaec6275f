//! `plugkit list` command

use anyhow::Result;

use super::output::Output;
use crate::catalog::Catalog;

pub fn run(catalog: &Catalog, output: &Output) -> Result<()> {
    let folders = catalog.discover()?;

    if output.is_json() {
        let items: Vec<_> = folders
            .into_iter()
            .map(|folder| {
                let id = folder.id.clone();
                match Catalog::load_folder(folder) {
                    Ok(plugin) => serde_json::json!({
                        "id": id,
                        "name": plugin.def.name,
                        "auth": plugin.def.auth.as_ref().map(|a| a.auth_type.to_string()),
                        "tools": plugin.def.tool_names(),
                        "capabilities": plugin.def.capabilities()
                            .iter()
                            .map(|c| c.to_string())
                            .collect::<Vec<_>>(),
                    }),
                    Err(e) => serde_json::json!({
                        "id": id,
                        "error": format!("{:#}", e),
                    }),
                }
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    if folders.is_empty() {
        output.line("No plugins in this catalog");
        return Ok(());
    }

    output.line(&format!("{:<20} {:<10} {:>5}  CAPABILITIES", "ID", "AUTH", "TOOLS"));
    output.line(&"-".repeat(60));

    for folder in folders {
        let id = folder.id.clone();
        match Catalog::load_folder(folder) {
            Ok(plugin) => {
                let auth = plugin
                    .def
                    .auth
                    .as_ref()
                    .map(|a| a.auth_type.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let caps: Vec<String> = plugin
                    .def
                    .capabilities()
                    .iter()
                    .map(|c| c.to_string())
                    .collect();
                output.line(&format!(
                    "{:<20} {:<10} {:>5}  {}",
                    id,
                    auth,
                    plugin.def.tool_names().len(),
                    caps.join(", ")
                ));
            }
            Err(_) => {
                output.line(&format!("{:<20} (invalid)", id));
            }
        }
    }

    Ok(())
}

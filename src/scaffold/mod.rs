//! # Plugin Scaffolder
//!
//! `plugkit new <name>` seeds a plugin folder that already passes
//! `validate` and `lint`: a readme with frontmatter, a theme-safe icon,
//! and a test file containing whichever boilerplate patterns the
//! generated definition requires.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::catalog::render_plugin;
use crate::domain::{ActionDef, Auth, AuthType, FieldDef, PluginDef, ResponseSpec, RestExec};

#[derive(Debug, Error, PartialEq)]
pub enum ScaffoldError {
    #[error("Invalid plugin name '{0}': must start with a lowercase letter and contain only lowercase letters, digits, and '-'")]
    InvalidName(String),

    #[error("Plugin folder already exists: {0}")]
    AlreadyExists(PathBuf),
}

/// Options for `plugkit new`
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaffoldOptions {
    /// Only list/get tools, no create/update/delete
    pub readonly: bool,

    /// Local auth (no stored credential) instead of api_key
    pub local: bool,
}

/// Checks a plugin name: `[a-z][a-z0-9-]*`
pub fn validate_name(name: &str) -> Result<(), ScaffoldError> {
    let mut chars = name.chars();

    let valid_start = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(ScaffoldError::InvalidName(name.to_string()))
    }
}

/// Generates a new plugin folder under the catalog root.
///
/// Returns the created folder path. Nothing is written when the name is
/// invalid or the folder already exists.
pub fn scaffold(
    root: &Path,
    name: &str,
    opts: ScaffoldOptions,
    default_tags: &[String],
) -> Result<PathBuf> {
    validate_name(name)?;

    let dir = root.join(name);
    if dir.exists() {
        return Err(ScaffoldError::AlreadyExists(dir).into());
    }

    let def = build_definition(name, opts, default_tags);
    let readme = render_plugin(&def, &readme_body(name))?;

    let tests_dir = dir.join("tests");
    fs::create_dir_all(&tests_dir)
        .with_context(|| format!("Failed to create {}", tests_dir.display()))?;

    fs::write(dir.join("readme.md"), readme)
        .with_context(|| format!("Failed to write readme in {}", dir.display()))?;
    fs::write(dir.join("icon.svg"), ICON_TEMPLATE)
        .with_context(|| format!("Failed to write icon in {}", dir.display()))?;
    fs::write(
        tests_dir.join(format!("{}.test.ts", name)),
        test_file(name, &def, opts),
    )
    .with_context(|| format!("Failed to write test file in {}", dir.display()))?;

    Ok(dir)
}

fn field(field_type: &str, required: bool, description: &str) -> FieldDef {
    FieldDef {
        field_type: field_type.to_string(),
        required,
        default: None,
        description: Some(description.to_string()),
    }
}

fn rest(url: &str, method: &str, mapping: &[(&str, &str)]) -> RestExec {
    let response = if mapping.is_empty() {
        None
    } else {
        Some(ResponseSpec {
            mapping: mapping
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    };

    RestExec {
        url: url.to_string(),
        method: method.to_string(),
        headers: BTreeMap::new(),
        body: None,
        response,
    }
}

fn build_definition(name: &str, opts: ScaffoldOptions, default_tags: &[String]) -> PluginDef {
    let base_url = format!("https://api.example.com/v1/{}", name);
    let mut actions: BTreeMap<String, ActionDef> = BTreeMap::new();

    actions.insert(
        format!("{}.list", name),
        ActionDef {
            description: Some("List items".to_string()),
            returns: Some("list".to_string()),
            readonly: true,
            exec: crate::domain::ExecutorSlots {
                rest: Some(rest(
                    &format!("{}/items", base_url),
                    "GET",
                    &[("id", "$[].id"), ("title", "$[].title")],
                )),
                ..Default::default()
            },
            ..Default::default()
        },
    );

    actions.insert(
        format!("{}.get", name),
        ActionDef {
            description: Some("Fetch one item".to_string()),
            params: BTreeMap::from([("id".to_string(), field("string", true, "Item id"))]),
            returns: Some("object".to_string()),
            readonly: true,
            exec: crate::domain::ExecutorSlots {
                rest: Some(rest(
                    &format!("{}/items/{{{{params.id}}}}", base_url),
                    "GET",
                    &[("id", "id"), ("title", "title")],
                )),
                ..Default::default()
            },
            ..Default::default()
        },
    );

    if !opts.readonly {
        let mut create = rest(
            &format!("{}/items", base_url),
            "POST",
            &[("id", "id"), ("title", "title")],
        );
        create.body = Some(serde_json::json!({ "title": "{{params.title}}" }));

        actions.insert(
            format!("{}.create", name),
            ActionDef {
                description: Some("Create an item".to_string()),
                params: BTreeMap::from([("title".to_string(), field("string", true, "Item title"))]),
                returns: Some("object".to_string()),
                exec: crate::domain::ExecutorSlots {
                    rest: Some(create),
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        let mut update = rest(
            &format!("{}/items/{{{{params.id}}}}", base_url),
            "PUT",
            &[("id", "id"), ("title", "title")],
        );
        update.body = Some(serde_json::json!({ "title": "{{params.title}}" }));

        actions.insert(
            format!("{}.update", name),
            ActionDef {
                description: Some("Update an item".to_string()),
                params: BTreeMap::from([
                    ("id".to_string(), field("string", true, "Item id")),
                    ("title".to_string(), field("string", true, "New title")),
                ]),
                returns: Some("object".to_string()),
                exec: crate::domain::ExecutorSlots {
                    rest: Some(update),
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        actions.insert(
            format!("{}.delete", name),
            ActionDef {
                description: Some("Delete an item".to_string()),
                params: BTreeMap::from([("id".to_string(), field("string", true, "Item id"))]),
                returns: Some("none".to_string()),
                exec: crate::domain::ExecutorSlots {
                    rest: Some(rest(
                        &format!("{}/items/{{{{params.id}}}}", base_url),
                        "DELETE",
                        &[],
                    )),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
    }

    let auth = if opts.local {
        Auth {
            auth_type: AuthType::Local,
            header: None,
            prefix: None,
            help_url: None,
        }
    } else {
        Auth {
            auth_type: AuthType::ApiKey,
            header: Some("Authorization".to_string()),
            prefix: Some("Bearer ".to_string()),
            help_url: Some("https://example.com/settings/api".to_string()),
        }
    };

    let tags = if default_tags.is_empty() {
        vec!["productivity".to_string()]
    } else {
        default_tags.to_vec()
    };

    PluginDef {
        id: name.to_string(),
        name: title_case(name),
        description: format!("Connector for {}", title_case(name)),
        icon: None,
        color: None,
        tags,
        auth: Some(auth),
        settings: BTreeMap::new(),
        schema: BTreeMap::new(),
        actions,
        operations: BTreeMap::new(),
        utilities: BTreeMap::new(),
    }
}

fn title_case(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn readme_body(name: &str) -> String {
    format!(
        r#"# {title}

Describe what this connector does and when the agent should use it.

## Setup

Explain where users obtain credentials and any service-side configuration.

## Notes for the agent

- Prefer `{name}.list` to discover existing items before creating new ones.
- All write operations are reversible via `{name}.delete`.
"#,
        title = title_case(name),
        name = name,
    )
}

const ICON_TEMPLATE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
  <rect x="3" y="3" width="18" height="18" rx="3"/>
  <path d="M8 12h8M12 8v8"/>
</svg>
"#;

fn test_file(name: &str, def: &PluginDef, opts: ScaffoldOptions) -> String {
    let guard = def.needs_credential();
    let cleanup = !opts.readonly;

    let mut imports = vec!["describe", "test", "expect"];
    if cleanup {
        imports.push("afterAll");
    }

    let mut helpers = vec!["client"];
    if guard {
        helpers.push("skipWithoutCredentials");
    }
    if cleanup {
        helpers.push("uniqueContent");
    }

    let mut out = String::new();
    out.push_str(&format!(
        "import {{ {} }} from 'bun:test';\n",
        imports.join(", ")
    ));
    out.push_str(&format!(
        "import {{ {} }} from '../../.helpers/client';\n\n",
        helpers.join(", ")
    ));

    if guard {
        out.push_str(&format!("skipWithoutCredentials('{}');\n\n", name));
    }

    out.push_str(&format!("describe('{}', () => {{\n", name));

    if cleanup {
        out.push_str("  const created: string[] = [];\n\n");
    }

    out.push_str(&format!(
        r#"  test('lists items', async () => {{
    const result = await client.call('run_plugin', {{
      plugin: '{name}',
      tool: '{name}.list',
      execute: true,
    }});
    expect(Array.isArray(result)).toBe(true);
  }});

  test('fetches one item', async () => {{
    const result = await client.call('run_plugin', {{
      plugin: '{name}',
      tool: '{name}.get',
      params: {{ id: 'example-id' }},
      execute: true,
    }});
    expect(result).toBeDefined();
  }});
"#,
        name = name
    ));

    if !opts.readonly {
        out.push_str(&format!(
            r#"
  test('creates an item', async () => {{
    const title = uniqueContent('{name}');
    const result = await client.call('run_plugin', {{
      plugin: '{name}',
      tool: '{name}.create',
      params: {{ title }},
      execute: true,
    }});
    expect(result.id).toBeDefined();
    created.push(result.id);
  }});

  test('updates an item', async () => {{
    const title = uniqueContent('{name}');
    const result = await client.call('run_plugin', {{
      plugin: '{name}',
      tool: '{name}.update',
      params: {{ id: created[0], title }},
      execute: true,
    }});
    expect(result.title).toBe(title);
  }});
"#,
            name = name
        ));
    }

    if cleanup {
        out.push_str(&format!(
            r#"
  afterAll(async () => {{
    for (const id of created) {{
      await client.call('run_plugin', {{
        plugin: '{name}',
        tool: '{name}.delete',
        params: {{ id }},
        execute: true,
      }});
    }}
  }});
"#,
            name = name
        ));
    }

    out.push_str("});\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::validate::{Selection, Validator};
    use tempfile::TempDir;

    #[test]
    fn rejects_invalid_names() {
        assert!(validate_name("9foo").is_err());
        assert!(validate_name("Foo").is_err());
        assert!(validate_name("foo_bar").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name("foo-bar2").is_ok());
    }

    #[test]
    fn creates_expected_files() {
        let dir = TempDir::new().unwrap();
        let created = scaffold(dir.path(), "foo", ScaffoldOptions::default(), &[]).unwrap();

        assert!(created.join("readme.md").is_file());
        assert!(created.join("icon.svg").is_file());
        assert!(created.join("tests/foo.test.ts").is_file());
    }

    #[test]
    fn default_scaffold_has_crud_and_guard() {
        let dir = TempDir::new().unwrap();
        scaffold(dir.path(), "foo", ScaffoldOptions::default(), &[]).unwrap();

        let readme = fs::read_to_string(dir.path().join("foo/readme.md")).unwrap();
        assert!(readme.contains("type: api_key"));
        assert!(readme.contains("foo.create"));
        assert!(readme.contains("foo.delete"));

        let test = fs::read_to_string(dir.path().join("foo/tests/foo.test.ts")).unwrap();
        assert!(test.contains("skipWithoutCredentials("));
        assert!(test.contains("afterAll("));
        assert!(test.contains("uniqueContent("));
    }

    #[test]
    fn local_readonly_scaffold_has_neither_guard_nor_cleanup() {
        let dir = TempDir::new().unwrap();
        scaffold(
            dir.path(),
            "foo",
            ScaffoldOptions {
                readonly: true,
                local: true,
            },
            &[],
        )
        .unwrap();

        let readme = fs::read_to_string(dir.path().join("foo/readme.md")).unwrap();
        assert!(readme.contains("type: local"));
        assert!(!readme.contains("foo.create"));

        let test = fs::read_to_string(dir.path().join("foo/tests/foo.test.ts")).unwrap();
        assert!(!test.contains("skipWithoutCredentials("));
        assert!(!test.contains("afterAll("));
    }

    #[test]
    fn existing_folder_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("foo")).unwrap();

        let err = scaffold(dir.path(), "foo", ScaffoldOptions::default(), &[]).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn invalid_name_writes_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(scaffold(dir.path(), "9foo", ScaffoldOptions::default(), &[]).is_err());
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn scaffolded_plugin_passes_validation() {
        let dir = TempDir::new().unwrap();
        scaffold(dir.path(), "foo", ScaffoldOptions::default(), &[]).unwrap();

        let catalog = Catalog::open(dir.path()).unwrap();
        let report = Validator::new(&catalog, false).run(&Selection::All).unwrap();

        assert!(
            report.passed(),
            "scaffolded plugin should validate cleanly: {:?}",
            report.reports[0].violations
        );
    }

    #[test]
    fn scaffolded_plugin_passes_lint() {
        let dir = TempDir::new().unwrap();
        scaffold(dir.path(), "foo", ScaffoldOptions::default(), &[]).unwrap();

        let catalog = Catalog::open(dir.path()).unwrap();
        let plugin = catalog.load("foo").unwrap();
        let missing = crate::lint::lint_plugin(&plugin.def, &plugin.folder.tests_dir()).unwrap();

        assert!(missing.is_empty(), "missing: {:?}", missing);
    }
}

//! Plugin definition model
//!
//! The frontmatter of a plugin's `readme.md`, as a typed structure.
//! A definition declares identity, an optional auth block, optional
//! settings/schema, and up to three maps of named tools (`actions`,
//! `operations`, `utilities`), each tool carrying exactly one executor
//! block or an ordered `steps` pipeline.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::capability::Capability;

/// How the plugin authenticates against its service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// Token stored in the host's credential store, sent as a header
    ApiKey,

    /// Local resource (database file, AppleScript target), no credential
    Local,

    /// Browser cookies imported by the host
    Cookies,
}

impl std::fmt::Display for AuthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthType::ApiKey => write!(f, "api_key"),
            AuthType::Local => write!(f, "local"),
            AuthType::Cookies => write!(f, "cookies"),
        }
    }
}

/// Auth block of a plugin definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auth {
    #[serde(rename = "type")]
    pub auth_type: AuthType,

    /// Header name the credential is injected into (e.g. `Authorization`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Value prefix before the credential (e.g. `Bearer `)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Where users obtain a credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
}

impl Auth {
    /// True if this auth type requires a stored credential
    pub fn needs_credential(&self) -> bool {
        !matches!(self.auth_type, AuthType::Local)
    }
}

/// A declared field: used for action params, plugin settings, and app schemas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response handling for an executor: raw response path -> entity field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// Destination field -> mapping expression (parsed by the validator)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mapping: BTreeMap<String, String>,
}

/// HTTP call executed by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestExec {
    pub url: String,

    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSpec>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// GraphQL request executed by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlExec {
    pub url: String,
    pub query: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSpec>,
}

/// SQL query against a local database (SQLite path or named connection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlExec {
    pub query: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSpec>,
}

/// CSV file read, local or fetched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CsvExec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSpec>,
}

fn default_delimiter() -> char {
    ','
}

/// Shell command executed by the host.
///
/// The host injects these environment variables into `run:` scripts:
/// `PARAM_{NAME}`, `PARAM_ACTION`, `PLUGIN_DIR`, `AUTH_TOKEN`,
/// `SETTING_{NAME}`, `AGENTOS_DOWNLOADS`, `AGENTOS_CACHE`, `AGENTOS_DATA`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandExec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Inline script, alternative to binary/args
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSpec>,
}

/// Swift or AppleScript snippet executed by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptExec {
    pub script: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSpec>,
}

/// Delegation to a declared app's local database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppExec {
    /// App id (e.g. `tasks`)
    pub target: String,

    /// App-level operation to invoke
    pub operation: String,
}

/// The executor strategies a tool can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    Rest,
    Graphql,
    Sql,
    Csv,
    Command,
    Swift,
    Applescript,
    App,
}

impl std::fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExecutorKind::Rest => "rest",
            ExecutorKind::Graphql => "graphql",
            ExecutorKind::Sql => "sql",
            ExecutorKind::Csv => "csv",
            ExecutorKind::Command => "command",
            ExecutorKind::Swift => "swift",
            ExecutorKind::Applescript => "applescript",
            ExecutorKind::App => "app",
        };
        write!(f, "{}", s)
    }
}

/// The executor keys an action (or step) may carry. At most one may be set;
/// the validator reports zero or several as a violation per action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutorSlots {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest: Option<RestExec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphql: Option<GraphqlExec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<SqlExec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<CsvExec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandExec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub swift: Option<ScriptExec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub applescript: Option<ScriptExec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<AppExec>,
}

impl ExecutorSlots {
    /// Kinds of all executor keys present
    pub fn kinds(&self) -> Vec<ExecutorKind> {
        let mut kinds = Vec::new();
        if self.rest.is_some() {
            kinds.push(ExecutorKind::Rest);
        }
        if self.graphql.is_some() {
            kinds.push(ExecutorKind::Graphql);
        }
        if self.sql.is_some() {
            kinds.push(ExecutorKind::Sql);
        }
        if self.csv.is_some() {
            kinds.push(ExecutorKind::Csv);
        }
        if self.command.is_some() {
            kinds.push(ExecutorKind::Command);
        }
        if self.swift.is_some() {
            kinds.push(ExecutorKind::Swift);
        }
        if self.applescript.is_some() {
            kinds.push(ExecutorKind::Applescript);
        }
        if self.app.is_some() {
            kinds.push(ExecutorKind::App);
        }
        kinds
    }

    /// True if no executor key is present
    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }

    /// The response spec of the present executor, if any declares one
    pub fn response(&self) -> Option<&ResponseSpec> {
        self.rest
            .as_ref()
            .and_then(|e| e.response.as_ref())
            .or_else(|| self.graphql.as_ref().and_then(|e| e.response.as_ref()))
            .or_else(|| self.sql.as_ref().and_then(|e| e.response.as_ref()))
            .or_else(|| self.csv.as_ref().and_then(|e| e.response.as_ref()))
            .or_else(|| self.command.as_ref().and_then(|e| e.response.as_ref()))
            .or_else(|| self.swift.as_ref().and_then(|e| e.response.as_ref()))
            .or_else(|| self.applescript.as_ref().and_then(|e| e.response.as_ref()))
    }

    /// All string fields that may carry `{{...}}` placeholders
    pub fn template_strings(&self) -> Vec<&str> {
        let mut out = Vec::new();

        if let Some(rest) = &self.rest {
            out.push(rest.url.as_str());
            out.extend(rest.headers.values().map(String::as_str));
            if let Some(body) = &rest.body {
                collect_value_strings(body, &mut out);
            }
        }
        if let Some(graphql) = &self.graphql {
            out.push(graphql.url.as_str());
            out.push(graphql.query.as_str());
            for v in graphql.variables.values() {
                collect_value_strings(v, &mut out);
            }
        }
        if let Some(sql) = &self.sql {
            out.push(sql.query.as_str());
            if let Some(db) = &sql.database {
                out.push(db.as_str());
            }
        }
        if let Some(csv) = &self.csv {
            if let Some(file) = &csv.file {
                out.push(file.as_str());
            }
            if let Some(url) = &csv.url {
                out.push(url.as_str());
            }
        }
        if let Some(command) = &self.command {
            if let Some(binary) = &command.binary {
                out.push(binary.as_str());
            }
            out.extend(command.args.iter().map(String::as_str));
            if let Some(run) = &command.run {
                out.push(run.as_str());
            }
        }
        if let Some(swift) = &self.swift {
            out.push(swift.script.as_str());
        }
        if let Some(applescript) = &self.applescript {
            out.push(applescript.script.as_str());
        }

        out
    }
}

fn collect_value_strings<'a>(value: &'a serde_json::Value, out: &mut Vec<&'a str>) {
    match value {
        serde_json::Value::String(s) => out.push(s.as_str()),
        serde_json::Value::Array(items) => {
            for item in items {
                collect_value_strings(item, out);
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values() {
                collect_value_strings(item, out);
            }
        }
        _ => {}
    }
}

/// One step of a multi-executor pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Binding name later steps can reference as `{{<name>.field}}`
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    #[serde(flatten)]
    pub exec: ExecutorSlots,
}

/// A named tool: one action, operation, or utility
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionDef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, FieldDef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub readonly: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provides: Option<Capability>,

    #[serde(flatten)]
    pub exec: ExecutorSlots,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
}

impl ActionDef {
    /// All executor slot sets of this action: the inline slots, or each step's
    pub fn all_slots(&self) -> Vec<&ExecutorSlots> {
        match &self.steps {
            Some(steps) => steps.iter().map(|s| &s.exec).collect(),
            None => vec![&self.exec],
        }
    }
}

/// A complete plugin definition (the frontmatter of `readme.md`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginDef {
    /// Must match the plugin's folder name
    pub id: String,

    pub name: String,
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Must be non-empty
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, FieldDef>,

    /// Entity schema for data apps with a local database
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schema: BTreeMap<String, FieldDef>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, ActionDef>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub operations: BTreeMap<String, ActionDef>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub utilities: BTreeMap<String, ActionDef>,
}

impl PluginDef {
    /// Iterates over all tools: actions, then operations, then utilities
    pub fn tools(&self) -> impl Iterator<Item = (&str, &ActionDef)> {
        self.actions
            .iter()
            .chain(self.operations.iter())
            .chain(self.utilities.iter())
            .map(|(name, def)| (name.as_str(), def))
    }

    /// All declared tool names, in map order
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools().map(|(name, _)| name).collect()
    }

    /// Tool names declared in more than one of the three maps
    pub fn duplicate_tool_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut dupes = Vec::new();
        for name in self.tool_names() {
            if !seen.insert(name) {
                dupes.push(name.to_string());
            }
        }
        dupes
    }

    /// Capabilities provided across all tools
    pub fn capabilities(&self) -> BTreeSet<Capability> {
        self.tools().filter_map(|(_, def)| def.provides).collect()
    }

    /// True if the plugin declares an auth block needing a credential
    pub fn needs_credential(&self) -> bool {
        self.auth.as_ref().is_some_and(Auth::needs_credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_yaml() -> &'static str {
        r#"
id: todoist
name: Todoist
description: Manage Todoist tasks
tags: [tasks, productivity]
auth:
  type: api_key
  header: Authorization
  prefix: "Bearer "
actions:
  task.list:
    readonly: true
    provides: tasks
    rest:
      url: https://api.todoist.com/rest/v2/tasks
      response:
        mapping:
          id: "[].id"
          title: "[].content"
  task.create:
    params:
      content:
        type: string
        required: true
    rest:
      url: https://api.todoist.com/rest/v2/tasks
      method: POST
      body:
        content: "{{params.content}}"
"#
    }

    #[test]
    fn parses_minimal_definition() {
        let def: PluginDef = serde_yaml::from_str(minimal_yaml()).unwrap();
        assert_eq!(def.id, "todoist");
        assert_eq!(def.tool_names(), vec!["task.create", "task.list"]);
        assert!(def.needs_credential());
    }

    #[test]
    fn rejects_unknown_top_level_field() {
        let yaml = "id: x\nname: X\ndescription: d\ntags: [a]\nbogus: 1\n";
        assert!(serde_yaml::from_str::<PluginDef>(yaml).is_err());
    }

    #[test]
    fn rejects_unknown_auth_type() {
        let yaml = "id: x\nname: X\ndescription: d\ntags: [a]\nauth:\n  type: oauth2\n";
        assert!(serde_yaml::from_str::<PluginDef>(yaml).is_err());
    }

    #[test]
    fn local_auth_needs_no_credential() {
        let auth = Auth {
            auth_type: AuthType::Local,
            header: None,
            prefix: None,
            help_url: None,
        };
        assert!(!auth.needs_credential());
    }

    #[test]
    fn executor_slots_single_kind() {
        let def: PluginDef = serde_yaml::from_str(minimal_yaml()).unwrap();
        let (_, list) = def.tools().find(|(n, _)| *n == "task.list").unwrap();
        assert_eq!(list.exec.kinds(), vec![ExecutorKind::Rest]);
        assert!(list.exec.response().is_some());
    }

    #[test]
    fn template_strings_include_body() {
        let def: PluginDef = serde_yaml::from_str(minimal_yaml()).unwrap();
        let (_, create) = def.tools().find(|(n, _)| *n == "task.create").unwrap();
        let strings = create.exec.template_strings();
        assert!(strings.iter().any(|s| s.contains("{{params.content}}")));
    }

    #[test]
    fn steps_parse_with_bindings() {
        let yaml = r#"
id: wiki
name: Wiki
description: d
tags: [reference]
operations:
  page.fetch:
    steps:
      - rest:
          url: https://example.com/search?q={{params.q}}
        as: search
      - rest:
          url: https://example.com/page/{{search.id}}
"#;
        let def: PluginDef = serde_yaml::from_str(yaml).unwrap();
        let (_, op) = def.tools().next().unwrap();
        let steps = op.steps.as_ref().unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].bind.as_deref(), Some("search"));
        assert!(steps[1].bind.is_none());
    }

    #[test]
    fn duplicate_names_across_maps_are_reported() {
        let yaml = r#"
id: x
name: X
description: d
tags: [a]
actions:
  sync:
    app:
      target: tasks
      operation: list
utilities:
  sync:
    command:
      run: echo hi
"#;
        let def: PluginDef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.duplicate_tool_names(), vec!["sync".to_string()]);
    }

    #[test]
    fn capabilities_are_collected() {
        let def: PluginDef = serde_yaml::from_str(minimal_yaml()).unwrap();
        let caps = def.capabilities();
        assert!(caps.contains(&Capability::Tasks));
        assert_eq!(caps.len(), 1);
    }

    #[test]
    fn frontmatter_serde_roundtrip() {
        let def: PluginDef = serde_yaml::from_str(minimal_yaml()).unwrap();
        let yaml = serde_yaml::to_string(&def).unwrap();
        let reparsed: PluginDef = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(def, reparsed);
    }
}

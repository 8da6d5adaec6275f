//! # Domain Model
//!
//! Typed model of the AgentOS plugin definition format.
//!
//! A plugin is a Markdown file with YAML frontmatter declaring identity,
//! an optional auth block, and named tools (actions, operations,
//! utilities). Each tool carries an executor block describing the I/O the
//! external host performs, plus a declarative response mapping. Nothing in
//! this module executes anything; it models and checks what contributors
//! write.

mod capability;
mod mapping;
mod plugin;
mod template;

pub use capability::Capability;
pub use mapping::{MappingError, MappingExpr, Segment, Transform};
pub use plugin::{
    ActionDef, AppExec, Auth, AuthType, CommandExec, CsvExec, ExecutorKind, ExecutorSlots,
    FieldDef, GraphqlExec, PluginDef, ResponseSpec, RestExec, ScriptExec, SqlExec, Step,
};
pub use template::{scan_refs, TemplateRef};

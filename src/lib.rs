//! Plugkit - Authoring toolkit for AgentOS plugin catalogs
//!
//! AgentOS plugins are declarative Markdown files with YAML frontmatter:
//! identity, an auth block, and named actions that map to executors
//! (`rest`, `graphql`, `sql`, ...) with response-to-schema mappings.
//! Plugkit validates those definitions at authoring time, lints their
//! end-to-end tests for required patterns, and scaffolds new plugins.
//! Execution of the definitions belongs to the external AgentOS Core host.

pub mod domain;
pub mod catalog;
pub mod validate;
pub mod lint;
pub mod scaffold;
pub mod cli;

pub use domain::{ActionDef, Capability, ExecutorKind, MappingExpr, PluginDef};
